//! # 重命名参数
//!
//! 一次重命名所需的全部参数，以及根据参数重新计算任务的纯函数。
//!
//! ## 依赖关系
//! - 被 `models/task.rs`, `commands/rename.rs` 使用
//! - 使用 `rename/` 与 `sequence/range.rs`

use super::task::{SequenceTask, TaskStatus};
use crate::error::{Result, SeqRenameError};
use crate::rename::{renumber, RenumberOptions, Replacer};
use crate::sequence::{encode_range_string, parse_range_string, range_padding};

/// 重命名参数（查找替换 + 重新编号 + 扩展名）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameParams {
    pub find: String,
    pub replace: String,
    pub ignore_case: bool,
    pub regex: bool,
    pub start: u64,
    pub step: u64,
    /// 补零位数；`None` 沿用各序列检测到的宽度
    pub padding: Option<usize>,
    pub preserve: bool,
    /// 按最大帧号取最小宽度，优先于 `padding`
    pub autopad: bool,
    pub change_ext: bool,
    pub new_ext: String,
}

impl Default for RenameParams {
    /// 恒等变换：不替换、保留编号与补零、不改扩展名
    fn default() -> Self {
        RenameParams {
            find: String::new(),
            replace: String::new(),
            ignore_case: false,
            regex: false,
            start: 1,
            step: 1,
            padding: None,
            preserve: true,
            autopad: false,
            change_ext: false,
            new_ext: String::new(),
        }
    }
}

impl RenameParams {
    /// 某个序列的重新编号参数，`detected` 为该序列当前的补零宽度
    pub fn renumber_options(&self, detected: usize) -> RenumberOptions {
        RenumberOptions {
            start: self.start,
            step: self.step,
            padding: self.padding.unwrap_or(detected),
            preserve: self.preserve,
            autopad: self.autopad,
        }
    }
}

/// 预编译的重命名规则，可复用于整个任务列表
#[derive(Debug, Clone)]
pub struct RenameRules {
    replacer: Replacer,
    params: RenameParams,
    new_ext: Option<String>,
}

impl RenameRules {
    /// 编译参数；正则无效时在任何 I/O 之前报错
    pub fn new(params: &RenameParams) -> Result<Self> {
        let replacer = Replacer::new(
            &params.find,
            &params.replace,
            params.ignore_case,
            params.regex,
        )?;

        let ext = params.new_ext.trim_start_matches('.');
        let new_ext = if params.change_ext && !ext.is_empty() {
            Some(format!(".{}", ext))
        } else {
            None
        };

        if params.step == 0 {
            return Err(SeqRenameError::InvalidParameters(
                "step must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            replacer,
            params: params.clone(),
            new_ext,
        })
    }

    /// 规则是否对任何任务都不产生改动
    pub fn is_identity(&self) -> bool {
        self.replacer.is_identity()
            && self.new_ext.is_none()
            && self.params.preserve
            && !self.params.autopad
            && self.params.padding.is_none()
    }

    /// 计算任务的 before/after 与状态，不修改原任务
    pub fn apply(&self, task: &SequenceTask) -> Result<SequenceTask> {
        let mut next = task.clone();
        next.before = task.template();

        let ext = self.new_ext.as_deref().unwrap_or(&task.ext);
        let prefix = self.replacer.apply(&task.prefix);

        next.after = match parse_range_string(&task.frames)? {
            Some(frames) => {
                let frames: Vec<u64> = frames.into_iter().collect();
                let numbering = self.params.renumber_options(range_padding(&task.frames));
                let (renumbered, padding) = renumber(&frames, &numbering)?;
                format!(
                    "{}[{}]{}",
                    prefix,
                    encode_range_string(renumbered, padding),
                    ext
                )
            }
            None => format!("{}{}", prefix, ext),
        };

        next.status = if next.before == next.after {
            TaskStatus::NothingToChange
        } else {
            TaskStatus::Ready
        };
        Ok(next)
    }
}

/// 根据参数重新计算单个任务
pub fn recompute_task(task: &SequenceTask, params: &RenameParams) -> Result<SequenceTask> {
    RenameRules::new(params)?.apply(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;
    use std::path::PathBuf;

    fn task(prefix: &str, frames: &str, ext: &str, count: usize) -> SequenceTask {
        SequenceTask::from_sequence(Sequence {
            dir: PathBuf::from("/renders"),
            prefix: prefix.to_string(),
            frames: frames.to_string(),
            ext: ext.to_string(),
            count,
        })
    }

    #[test]
    fn test_default_params_change_nothing() {
        let t = task("shot.", "0001-0010", ".exr", 10);
        let next = recompute_task(&t, &RenameParams::default()).unwrap();
        assert_eq!(next.before, "shot.[0001-0010].exr");
        assert_eq!(next.after, next.before);
        assert_eq!(next.status, TaskStatus::NothingToChange);
        assert!(RenameRules::new(&RenameParams::default()).unwrap().is_identity());
    }

    #[test]
    fn test_find_replace_keeps_padding() {
        let t = task("shot.", "0001-0010", ".exr", 10);
        let params = RenameParams {
            find: "shot".to_string(),
            replace: "comp".to_string(),
            ..RenameParams::default()
        };
        let next = recompute_task(&t, &params).unwrap();
        assert_eq!(next.after, "comp.[0001-0010].exr");

        let unpadded = task("img", "8-11", ".png", 4);
        let next = recompute_task(&unpadded, &params).unwrap();
        assert_eq!(next.after, "img[8-11].png");
        assert_eq!(next.status, TaskStatus::NothingToChange);
    }

    #[test]
    fn test_autopad_is_opt_in() {
        let t = task("shot.", "0001-0010", ".exr", 10);
        let params = RenameParams {
            autopad: true,
            ..RenameParams::default()
        };
        assert!(!RenameRules::new(&params).unwrap().is_identity());
        let next = recompute_task(&t, &params).unwrap();
        assert_eq!(next.after, "shot.[01-10].exr");
        assert_eq!(next.status, TaskStatus::Ready);
    }

    #[test]
    fn test_find_replace_and_renumber() {
        let t = task("sh010_comp.", "0101-0103, 0200", ".exr", 4);
        let params = RenameParams {
            find: "sh010".to_string(),
            replace: "sh020".to_string(),
            preserve: false,
            start: 1001,
            ..RenameParams::default()
        };
        let next = recompute_task(&t, &params).unwrap();
        assert_eq!(next.after, "sh020_comp.[1001-1004].exr");
        assert_eq!(next.status, TaskStatus::Ready);
        // 原任务不变
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.after, t.before);
    }

    #[test]
    fn test_repad_only() {
        let t = task("plate_", "0007-0009", ".dpx", 3);
        let params = RenameParams {
            padding: Some(6),
            ..RenameParams::default()
        };
        let next = recompute_task(&t, &params).unwrap();
        assert_eq!(next.after, "plate_[000007-000009].dpx");
    }

    #[test]
    fn test_change_extension_single_file() {
        let t = task("notes", "", ".txt", 1);
        let params = RenameParams {
            change_ext: true,
            new_ext: ".md".to_string(),
            ..RenameParams::default()
        };
        let next = recompute_task(&t, &params).unwrap();
        assert_eq!(next.before, "notes.txt");
        assert_eq!(next.after, "notes.md");
        assert_eq!(next.status, TaskStatus::Ready);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let t = task("a.", "1-3", ".exr", 3);
        let bad_regex = RenameParams {
            find: "(".to_string(),
            regex: true,
            ..RenameParams::default()
        };
        assert!(matches!(
            recompute_task(&t, &bad_regex),
            Err(SeqRenameError::InvalidPattern { .. })
        ));

        let bad_step = RenameParams {
            step: 0,
            preserve: false,
            ..RenameParams::default()
        };
        assert!(matches!(
            recompute_task(&t, &bad_step),
            Err(SeqRenameError::InvalidParameters(_))
        ));
    }
}
