//! # scan 子命令 CLI 定义
//!
//! 检测输入中的文件序列。检测参数同时被 `rename` 复用。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs`, `cli/rename.rs` 使用
//! - 参数传递给 `commands/scan.rs`

use crate::sequence::DetectOptions;

use clap::Args;
use std::path::PathBuf;

/// 序列检测参数
#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    /// Input files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Separator between name and frame number (empty = trailing digits)
    #[arg(short, long, env = "SEQRENAME_DELIMITER", default_value = "")]
    pub delimiter: String,

    /// Treat frames with different zero padding as one sequence
    #[arg(long, default_value_t = false)]
    pub ignore_padding: bool,

    /// Only take the contiguous chunk containing each input file
    #[arg(long, default_value_t = false)]
    pub contiguous: bool,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Glob filter on file names (directories: on sequence names, e.g. 'shot.#.exr')
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Number of parallel detection jobs (0 = auto)
    #[arg(short, long, env = "SEQRENAME_JOBS", default_value_t = 0)]
    pub jobs: usize,
}

impl DetectArgs {
    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            delimiter: self.delimiter.clone(),
            ignore_padding: self.ignore_padding,
            contiguous: self.contiguous,
        }
    }
}

/// scan 子命令参数
#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub detect: DetectArgs,
}
