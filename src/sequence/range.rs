//! # 帧范围编解码
//!
//! 在帧号集合与紧凑的范围字符串之间相互转换。
//!
//! ## 格式
//! - 单个数字: `20`
//! - 连续区间: `1-5`
//! - 带步长区间（仅输入）: `50-55x2`
//! - 倒序区间（仅输入）: `10-1`
//!
//! 多个片段以逗号和/或空白分隔，输出统一使用 `", "`。
//!
//! ## 依赖关系
//! - 被 `sequence/detect.rs`, `sequence/template.rs`, `models/params.rs` 使用
//! - 无外部模块依赖

use crate::error::{Result, SeqRenameError};

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// 帧号集合（无重复，迭代时升序）
pub type FrameSet = BTreeSet<u64>;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<first>\d+)(?:-(?P<last>\d+)(?:x(?P<step>\d+))?)?$")
            .expect("static range token pattern")
    })
}

/// 数字位数，`digit_count(0) == 1`
pub fn digit_count(mut n: u64) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// 零填充到指定宽度（超宽数字不截断）
pub fn pad_frame(frame: u64, padding: usize) -> String {
    format!("{:0width$}", frame, width = padding)
}

/// 范围字符串的补零位数：最窄数字的宽度（步长后缀不计入）
///
/// 与 `encode_range_string` 互逆：编码时每个数字至少补到 `padding` 位，
/// 因此最窄的数字恰好给出可还原全部帧号的宽度。
pub fn range_padding(range: &str) -> usize {
    tokens(range)
        .flat_map(|t| t.split('x').next().unwrap_or(t).split('-'))
        .filter(|n| !n.is_empty())
        .map(str::len)
        .min()
        .unwrap_or(0)
}

/// 按书写顺序切分片段
fn tokens(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

fn parse_number(token: &str, digits: &str) -> Result<u64> {
    digits
        .parse()
        .map_err(|_| SeqRenameError::InvalidRange(token.to_string()))
}

/// 展开单个片段为帧号序列
fn expand_token(token: &str) -> Result<Vec<u64>> {
    let caps = token_pattern()
        .captures(token)
        .ok_or_else(|| SeqRenameError::InvalidRange(token.to_string()))?;

    let first = parse_number(token, &caps["first"])?;
    let last = match caps.name("last") {
        Some(m) => parse_number(token, m.as_str())?,
        None => return Ok(vec![first]),
    };
    let step = match caps.name("step") {
        Some(m) => parse_number(token, m.as_str())?,
        None => 1,
    };
    if step == 0 {
        return Err(SeqRenameError::InvalidRange(token.to_string()));
    }

    let step = usize::try_from(step).unwrap_or(usize::MAX);
    let frames = if first > last {
        (last..=first).rev().step_by(step).collect()
    } else {
        (first..=last).step_by(step).collect()
    };
    Ok(frames)
}

/// 按书写顺序解析范围字符串，保留首次出现的帧号
///
/// 空输入返回 `Ok(None)`，与格式错误区分。
pub fn parse_frame_list(s: &str) -> Result<Option<Vec<u64>>> {
    let mut seen = FrameSet::new();
    let mut frames = Vec::new();
    let mut any = false;

    for token in tokens(s) {
        any = true;
        for frame in expand_token(token)? {
            if seen.insert(frame) {
                frames.push(frame);
            }
        }
    }

    Ok(if any { Some(frames) } else { None })
}

/// 解析范围字符串为帧号集合
///
/// e.g. `"1-5, 20, 24, 50-55x2, 1001-1002"`
/// → `{1, 2, 3, 4, 5, 20, 24, 50, 52, 54, 1001, 1002}`
pub fn parse_range_string(s: &str) -> Result<Option<FrameSet>> {
    Ok(parse_frame_list(s)?.map(|frames| frames.into_iter().collect()))
}

/// 将帧号合并为连续区间 `(first, last)`（升序、去重）
pub fn contiguous_runs<I>(frames: I) -> Vec<(u64, u64)>
where
    I: IntoIterator<Item = u64>,
{
    let sorted: FrameSet = frames.into_iter().collect();
    let mut runs: Vec<(u64, u64)> = Vec::new();

    for frame in sorted {
        match runs.last_mut() {
            Some((_, last)) if *last + 1 == frame => *last = frame,
            _ => runs.push((frame, frame)),
        }
    }
    runs
}

/// 编码帧号为范围字符串
///
/// e.g. `[1, 2, 3, 4, 5, 20, 24, 1001, 1002]` → `"1-5, 20, 24, 1001-1002"`
pub fn encode_range_string<I>(frames: I, padding: usize) -> String
where
    I: IntoIterator<Item = u64>,
{
    contiguous_runs(frames)
        .into_iter()
        .map(|(first, last)| {
            if first == last {
                pad_frame(first, padding)
            } else {
                format!("{}-{}", pad_frame(first, padding), pad_frame(last, padding))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// 返回包含目标帧的那一段（逗号片段）
pub fn detect_contiguous_subrange(range: &str, target: u64) -> Result<Option<String>> {
    for chunk in range.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if let Some(frames) = parse_frame_list(chunk)? {
            if frames.contains(&target) {
                return Ok(Some(chunk.to_string()));
            }
        }
    }
    Ok(None)
}
