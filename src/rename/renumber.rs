//! # 重新编号
//!
//! 根据起始值、步长与补零设置计算新的帧号列表。
//!
//! ## 模式
//! - 保留编号（`preserve`）: 帧号不变，仅改变补零宽度
//! - 重新编号: 按输入顺序依次赋值 `start, start+step, ...`
//!
//! ## 依赖关系
//! - 被 `models/params.rs` 使用
//! - 使用 `sequence/range.rs` 计算位数

use crate::error::{Result, SeqRenameError};
use crate::sequence::digit_count;

/// 重新编号参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenumberOptions {
    pub start: u64,
    pub step: u64,
    pub padding: usize,
    pub preserve: bool,
    pub autopad: bool,
}

/// 重新编号，返回 (新帧号, 实际补零位数)
pub fn renumber(frames: &[u64], options: &RenumberOptions) -> Result<(Vec<u64>, usize)> {
    if options.step == 0 {
        return Err(SeqRenameError::InvalidParameters(
            "step must be greater than zero".to_string(),
        ));
    }

    if options.preserve {
        let max = frames.iter().copied().max().ok_or_else(|| {
            SeqRenameError::InvalidParameters(
                "cannot preserve numbering of an empty frame list".to_string(),
            )
        })?;
        let padding = if options.autopad {
            digit_count(max)
        } else {
            options.padding
        };
        return Ok((frames.to_vec(), padding));
    }

    let overflow = || {
        SeqRenameError::InvalidParameters(format!(
            "renumbering {} frames from {} by {} overflows",
            frames.len(),
            options.start,
            options.step
        ))
    };

    let mut renumbered = Vec::with_capacity(frames.len());
    let mut next = options.start;
    for i in 0..frames.len() {
        if i > 0 {
            next = next.checked_add(options.step).ok_or_else(overflow)?;
        }
        renumbered.push(next);
    }

    let padding = if options.autopad {
        digit_count(renumbered.last().copied().unwrap_or(options.start))
    } else {
        options.padding
    };

    Ok((renumbered, padding))
}
