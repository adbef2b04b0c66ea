//! # seqrename - 编号文件序列批量重命名
//!
//! 检测目录中的编号文件序列（e.g. `shot.0001.exr` … `shot.0100.exr`），
//! 以序列为单位执行查找替换、重新编号与更换扩展名。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (收集、冲突检测、两阶段重命名)
//!   │     ├── models/    (任务与参数)
//!   │     ├── rename/    (查找替换、重新编号)
//!   │     └── sequence/  (范围编解码、序列检测、模板展开)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod models;
pub mod rename;
pub mod sequence;
pub mod utils;

pub use error::{Result, SeqRenameError};
