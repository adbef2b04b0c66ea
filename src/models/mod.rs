//! # 数据模型模块
//!
//! 重命名任务、任务列表与重命名参数。
//!
//! ## 依赖关系
//! - 被 `batch/` 和 `commands/` 使用
//! - 子模块: task, params

pub mod params;
pub mod task;

pub use params::{recompute_task, RenameParams, RenameRules};
pub use task::{RefreshSummary, SequenceTask, TaskList, TaskStatus};
