//! # 重命名任务模型
//!
//! 一个任务对应一个序列（或单个文件）的一次重命名操作。
//!
//! ## 依赖关系
//! - 被 `batch/`, `commands/` 使用
//! - 使用 `models/params.rs` 重新计算任务
//! - 使用 `batch/conflict.rs` 标记冲突

use super::params::{RenameParams, RenameRules};
use crate::batch::conflict;
use crate::batch::TaskResult;
use crate::error::Result;
use crate::sequence::{detect_sequence, DetectOptions, Sequence};

use std::fmt;
use std::path::PathBuf;

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    /// 刚检测到，尚未计算
    #[default]
    Pending,
    /// 可执行
    Ready,
    /// 重命名前后相同
    NothingToChange,
    /// 输出路径与其他任务冲突
    Conflict,
    /// 全部完成
    Complete,
    /// 完成但有 n 个错误
    PartialError(usize),
    /// 因错误或取消提前停止
    Interrupted,
}

impl TaskStatus {
    /// 是否为执行后的终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Complete | TaskStatus::PartialError(_) | TaskStatus::Interrupted
        )
    }

    /// 预演结束后是否允许正式执行
    pub fn is_clean(&self) -> bool {
        matches!(self, TaskStatus::Ready | TaskStatus::NothingToChange)
    }

    /// 错误数量
    pub fn errors(&self) -> usize {
        match self {
            TaskStatus::PartialError(n) => *n,
            _ => 0,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "Pending"),
            TaskStatus::Ready => write!(f, "Ready"),
            TaskStatus::NothingToChange => write!(f, "Nothing to change"),
            TaskStatus::Conflict => write!(f, "Output filename conflict"),
            TaskStatus::Complete => write!(f, "Complete"),
            TaskStatus::PartialError(1) => write!(f, "1 error"),
            TaskStatus::PartialError(n) => write!(f, "{} errors", n),
            TaskStatus::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// 单个重命名任务
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequenceTask {
    /// 文件所在目录
    pub path: PathBuf,
    /// 帧号之前的部分
    pub prefix: String,
    /// 范围字符串；为空表示单个文件
    pub frames: String,
    /// 扩展名（含 `.`）
    pub ext: String,
    /// 文件数量
    pub count: usize,
    /// 重命名前模板，e.g. `shot.[0001-0100].exr`
    pub before: String,
    /// 重命名后模板
    pub after: String,
    pub status: TaskStatus,
    /// 执行日志（逐文件）
    pub log: Vec<String>,
}

impl SequenceTask {
    /// 由检测结果创建任务
    pub fn from_sequence(seq: Sequence) -> Self {
        let mut task = SequenceTask {
            path: seq.dir,
            prefix: seq.prefix,
            frames: seq.frames,
            ext: seq.ext,
            count: seq.count,
            ..Default::default()
        };
        task.before = task.template();
        task.after = task.before.clone();
        task
    }

    /// 当前磁盘状态对应的模板
    pub fn template(&self) -> String {
        if self.frames.is_empty() {
            format!("{}{}", self.prefix, self.ext)
        } else {
            format!("{}[{}]{}", self.prefix, self.frames, self.ext)
        }
    }

    /// 是否与 (path, prefix, ext) 指向同一序列
    pub fn same_sequence(&self, seq: &Sequence) -> bool {
        self.path == seq.dir && self.prefix == seq.prefix && self.ext == seq.ext
    }
}

/// 重新计算后的汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// 将被重命名的文件数
    pub rename_count: usize,
    /// 全部任务的文件数
    pub total_count: usize,
    /// 冲突的输出路径数
    pub conflicts: usize,
}

/// 任务列表
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<SequenceTask>,
    summary: RefreshSummary,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[SequenceTask] {
        &self.tasks
    }

    pub fn get(&self, id: usize) -> Option<&SequenceTask> {
        self.tasks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 添加检测到的序列，返回任务 ID
    ///
    /// 已存在相同 (path, prefix, ext) 的任务时仅更新帧范围与数量。
    pub fn add(&mut self, seq: Sequence) -> usize {
        if let Some(id) = self.tasks.iter().position(|t| t.same_sequence(&seq)) {
            let task = &mut self.tasks[id];
            if task.frames != seq.frames {
                task.frames = seq.frames;
                task.count = seq.count;
            }
            return id;
        }
        self.tasks.push(SequenceTask::from_sequence(seq));
        self.tasks.len() - 1
    }

    /// 移除指定任务（ID 按删除前的顺序）
    pub fn remove(&mut self, ids: &[usize]) {
        let mut ids = ids.to_vec();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids.dedup();
        for id in ids {
            if id < self.tasks.len() {
                self.tasks.remove(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.summary = RefreshSummary::default();
    }

    /// 按参数重新计算全部任务并标记冲突
    pub fn refresh(&mut self, params: &RenameParams) -> Result<RefreshSummary> {
        let rules = RenameRules::new(params)?;
        let tasks = self
            .tasks
            .iter()
            .map(|t| rules.apply(t))
            .collect::<Result<Vec<_>>>()?;
        self.tasks = tasks;

        let conflicts = conflict::mark_conflicts(&mut self.tasks);
        self.summary = RefreshSummary {
            rename_count: self
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Ready)
                .map(|t| t.count)
                .sum(),
            total_count: self.tasks.iter().map(|t| t.count).sum(),
            conflicts,
        };
        Ok(self.summary)
    }

    pub fn summary(&self) -> RefreshSummary {
        self.summary
    }

    /// 是否允许提交：至少一个可执行任务且没有冲突
    pub fn can_commit(&self) -> bool {
        self.summary.conflicts == 0 && self.tasks.iter().any(|t| t.status == TaskStatus::Ready)
    }

    /// 处理执行结果
    ///
    /// 完成的任务从最后写入的文件重新检测，使任务反映新的磁盘状态。
    pub fn apply_result(&mut self, result: &TaskResult, options: &DetectOptions) {
        let Some(task) = self.tasks.get_mut(result.id) else {
            return;
        };

        task.status = result.status;
        task.log = result.log.clone();

        if result.status != TaskStatus::Complete {
            return;
        }
        let Some(last) = result.last_path.as_ref().filter(|p| p.is_file()) else {
            return;
        };
        if let Ok(seq) = detect_sequence(last, options) {
            task.path = seq.dir;
            task.prefix = seq.prefix;
            task.frames = seq.frames;
            task.ext = seq.ext;
            task.count = seq.count;
            task.before = task.template();
            task.after = task.before.clone();
        }
    }
}
