//! # range 子命令 CLI 定义
//!
//! 帧范围工具，包含多个子命令：
//! - `expand`: 范围字符串展开为帧号
//! - `compress`: 帧号压缩为范围字符串
//! - `files`: 模板展开为文件路径
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/range.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// range 主命令参数
#[derive(Args, Debug)]
pub struct RangeArgs {
    #[command(subcommand)]
    pub command: RangeCommands,
}

/// range 子命令
#[derive(Subcommand, Debug)]
pub enum RangeCommands {
    /// Expand a range string (e.g. '1-5, 20, 50-55x2') into frame numbers
    Expand(ExpandArgs),

    /// Compress frame numbers into a range string
    Compress(CompressArgs),

    /// Expand a template (e.g. 'shot.[0001-0010].exr') into file paths
    Files(FilesArgs),
}

/// expand 子命令参数
#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Range string
    pub range: String,

    /// Keep the written order instead of sorting
    #[arg(long, default_value_t = false)]
    pub unsorted: bool,
}

/// compress 子命令参数
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Frame numbers or range tokens
    #[arg(required = true)]
    pub numbers: Vec<String>,

    /// Zero padding width
    #[arg(short, long, default_value_t = 0)]
    pub padding: usize,
}

/// files 子命令参数
#[derive(Args, Debug)]
pub struct FilesArgs {
    /// Sequence template
    pub template: String,

    /// Directory the template is relative to
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}
