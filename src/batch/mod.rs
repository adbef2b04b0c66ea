//! # 批量处理模块
//!
//! 输入收集、冲突检测与两阶段批量重命名。
//!
//! ## 功能
//! - 自动检测输入类型（文件/目录）并收集序列
//! - 输出路径冲突检测
//! - 预演 → 正式执行的顺序重命名
//! - 后台线程执行与事件通知
//! - CSV 报告
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `models/task.rs` 使用
//! - 使用 `rayon` 并行检测
//! - 使用 `crossbeam-channel` 传递后台事件

pub mod collector;
pub mod conflict;
pub mod fs;
pub mod report;
pub mod runner;
pub mod worker;

pub use collector::{CollectResult, InputCollector};
pub use conflict::{find_conflicts, find_file_overlaps, mark_conflicts};
pub use fs::{FileSystem, LocalFs};
pub use report::{write_csv_report, BatchOutcome, BatchReport, TaskResult};
pub use runner::{BatchObserver, BatchOptions, BatchRenamer, CancelToken, NoopObserver};
pub use worker::{BatchEvent, BatchHandle, BatchWorker};
