//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `scan`: 检测并列出序列
//! - `rename`: 批量重命名序列
//! - `range`: 帧范围工具（嵌套子命令）
//!   - `expand`: 范围字符串 → 帧号
//!   - `compress`: 帧号 → 范围字符串
//!   - `files`: 模板 → 文件路径
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: scan, rename, range

pub mod range;
pub mod rename;
pub mod scan;

use clap::{Parser, Subcommand};

/// seqrename - 编号文件序列批量重命名工具
#[derive(Parser)]
#[command(name = "seqrename")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Detect and batch-rename numbered file sequences", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print per-file details
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Detect file sequences and list them
    Scan(scan::ScanArgs),

    /// Rename file sequences (find/replace, renumber, change extension)
    Rename(rename::RenameArgs),

    /// Frame range utilities
    Range(range::RangeArgs),
}
