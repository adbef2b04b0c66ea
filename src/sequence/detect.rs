//! # 序列检测
//!
//! 根据单个文件路径或目录推断文件序列（前缀 + 帧号 + 扩展名）。
//!
//! ## 功能
//! - 从单个文件出发扫描同目录下的兄弟帧
//! - 列出目录中的所有序列模板（`prefix#ext`）
//! - 根据模板定位首帧并检测
//!
//! ## 依赖关系
//! - 被 `batch/collector.rs`, `models/task.rs` 使用
//! - 使用 `sequence/range.rs` 编码帧号
//! - 使用 `glob` 解析序列模板

use super::range::{self, FrameSet};
use crate::error::{Result, SeqRenameError};

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// 序列检测选项
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    /// 前缀与帧号之间的分隔符；为空时取文件名末尾的连续数字
    pub delimiter: String,
    /// 忽略补零位数差异
    pub ignore_padding: bool,
    /// 仅返回包含该文件的连续片段
    pub contiguous: bool,
}

/// 检测到的序列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// 所在目录
    pub dir: PathBuf,
    /// 帧号之前的部分（含分隔符）
    pub prefix: String,
    /// 范围字符串；为空表示非序列的单个文件
    pub frames: String,
    /// 扩展名（含前导 `.`）
    pub ext: String,
    /// 文件数量
    pub count: usize,
}

impl Sequence {
    /// 是否为编号序列
    pub fn is_sequence(&self) -> bool {
        !self.frames.is_empty()
    }

    /// 渲染为模板字符串，e.g. `shot.[0001-0100].exr`
    pub fn template(&self) -> String {
        if self.frames.is_empty() {
            format!("{}{}", self.prefix, self.ext)
        } else {
            format!("{}[{}]{}", self.prefix, self.frames, self.ext)
        }
    }
}

/// 拆分文件名为 (主干, 扩展名)，前导的 `.` 不视为扩展名分隔
pub fn split_ext(filename: &str) -> (&str, &str) {
    let leading = filename.len() - filename.trim_start_matches('.').len();
    match filename[leading..].rfind('.') {
        Some(idx) => filename.split_at(leading + idx),
        None => (filename, ""),
    }
}

/// 拆分主干为 (前缀, 帧号字符串)
///
/// 前缀保留分隔符本身，使 `prefix + frame + ext` 还原文件名。
fn split_frame<'a>(base: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let split_at = if delimiter.is_empty() {
        base.trim_end_matches(|c: char| c.is_ascii_digit()).len()
    } else {
        base.rfind(delimiter)? + delimiter.len()
    };

    let (prefix, digits) = base.split_at(split_at);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((prefix, digits))
}

/// 构造匹配兄弟帧的正则，帧号在第一个捕获组
fn sibling_pattern(prefix: &str, ext: &str, padding: Option<usize>) -> Result<Regex> {
    let digits = match padding {
        Some(n) => format!(r"(\d{{{}}})", n),
        None => r"(\d+)".to_string(),
    };
    let pattern = format!("^{}{}{}$", regex::escape(prefix), digits, regex::escape(ext));
    Regex::new(&pattern).map_err(|e| SeqRenameError::InvalidPattern {
        pattern,
        reason: e.to_string(),
    })
}

/// 忽略补零时的编码宽度
///
/// 所有帧都能按最窄宽度还原时取最窄宽度（e.g. `img8` … `img11` 取 1）；
/// 同一帧存在不同补零写法时退回起始文件的宽度。
fn loose_padding(matched: &[(u64, String)], original: usize) -> usize {
    let narrowest = matched.iter().map(|(_, d)| d.len()).min().unwrap_or(original);
    if matched
        .iter()
        .all(|(n, digits)| range::pad_frame(*n, narrowest) == *digits)
    {
        narrowest
    } else {
        original
    }
}

/// 列出目录中的常规文件名
fn list_files(dir: &Path) -> Result<Vec<String>> {
    let scan_dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    let entries = fs::read_dir(scan_dir).map_err(|e| SeqRenameError::FileReadError {
        path: scan_dir.display().to_string(),
        source: e,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

/// 从单个文件出发检测序列
pub fn detect_sequence(file: &Path, options: &DetectOptions) -> Result<Sequence> {
    if !file.is_file() {
        return Err(SeqRenameError::FileNotFound {
            path: file.display().to_string(),
        });
    }

    let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SeqRenameError::InvalidArgument(format!(
            "Filename is not valid UTF-8: {}",
            file.display()
        )))?;
    let (base, ext) = split_ext(filename);

    let (prefix, digits) = match split_frame(base, &options.delimiter) {
        Some(parts) => parts,
        None => {
            return Ok(Sequence {
                dir,
                prefix: base.to_string(),
                frames: String::new(),
                ext: ext.to_string(),
                count: 1,
            })
        }
    };

    let padding = digits.len();
    let frame: u64 = match digits.parse() {
        Ok(n) => n,
        Err(_) => {
            return Ok(Sequence {
                dir,
                prefix: base.to_string(),
                frames: String::new(),
                ext: ext.to_string(),
                count: 1,
            })
        }
    };

    let pattern = sibling_pattern(
        prefix,
        ext,
        if options.ignore_padding { None } else { Some(padding) },
    )?;

    let mut matched: Vec<(u64, String)> = Vec::new();
    for name in list_files(&dir)? {
        if let Some(caps) = pattern.captures(&name) {
            if let Ok(n) = caps[1].parse::<u64>() {
                matched.push((n, caps[1].to_string()));
            }
        }
    }

    let encode_padding = if options.ignore_padding {
        loose_padding(&matched, padding)
    } else {
        padding
    };
    // 只保留按该宽度书写的帧，保证模板能还原每个文件名
    let frames: FrameSet = matched
        .iter()
        .filter(|(n, digits)| range::pad_frame(*n, encode_padding) == *digits)
        .map(|(n, _)| *n)
        .collect();
    let mut range_str = range::encode_range_string(frames.iter().copied(), encode_padding);
    let mut count = frames.len();

    if options.contiguous {
        if let Some(chunk) = range::detect_contiguous_subrange(&range_str, frame)? {
            count = range::parse_frame_list(&chunk)?.map(|f| f.len()).unwrap_or(0);
            range_str = chunk;
        }
    }

    Ok(Sequence {
        dir,
        prefix: prefix.to_string(),
        frames: range_str,
        ext: ext.to_string(),
        count,
    })
}

/// 列出目录中的序列模板，e.g. `shot.#.exr`
///
/// 跳过子目录和以 `.` 开头的文件。
pub fn enumerate_bases(dir: &Path, delimiter: &str) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(SeqRenameError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let trailing = Regex::new(&format!(r"{}\d+$", regex::escape(delimiter))).map_err(|e| {
        SeqRenameError::InvalidPattern {
            pattern: delimiter.to_string(),
            reason: e.to_string(),
        }
    })?;

    let mut bases: Vec<String> = list_files(dir)?
        .iter()
        .filter(|name| !name.starts_with('.'))
        .filter_map(|name| {
            let (root, ext) = split_ext(name);
            trailing
                .find(root)
                .map(|m| format!("{}{}#{}", &root[..m.start()], delimiter, ext))
        })
        .collect();

    bases.sort();
    bases.dedup();
    Ok(bases)
}

/// 根据模板定位首帧（按文件名排序）并检测序列
pub fn get_sequence(dir: &Path, base: &str, options: &DetectOptions) -> Result<Sequence> {
    let (head, tail) = base.split_once('#').ok_or_else(|| {
        SeqRenameError::InvalidArgument(format!("Sequence template has no '#': {}", base))
    })?;

    let glob_pattern = format!(
        "{}*{}",
        glob::Pattern::escape(head),
        glob::Pattern::escape(tail)
    );
    let full_pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join(&glob_pattern);
    let verify = sibling_pattern(head, tail, None)?;

    let mut candidates: Vec<PathBuf> = glob::glob(&full_pattern.to_string_lossy())
        .map_err(|e| SeqRenameError::InvalidArgument(format!(
            "Invalid pattern '{}': {}",
            glob_pattern, e
        )))?
        .filter_map(|p| p.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| verify.is_match(n))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    let first = candidates
        .first()
        .ok_or_else(|| SeqRenameError::NoSequencesFound {
            path: full_pattern.display().to_string(),
        })?;
    detect_sequence(first, options)
}
