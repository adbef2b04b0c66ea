//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `models/`, `sequence/`, `utils/`
//! - 子模块: scan, rename, range

pub mod range;
pub mod rename;
pub mod scan;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Scan(args) => scan::execute(args),
        Commands::Rename(args) => rename::execute(args),
        Commands::Range(args) => range::execute(args),
    }
}
