//! # 批量执行结果
//!
//! 单个任务与整批任务的执行结果汇总，以及 CSV 报告导出。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `batch/worker.rs`, `models/task.rs`, `commands/rename.rs` 使用
//! - 使用 `csv` + `serde` 写入报告

use crate::error::{Result, SeqRenameError};
use crate::models::{SequenceTask, TaskStatus};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// 单个任务的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    /// 任务 ID（在提交的任务列表中的下标）
    pub id: usize,
    pub status: TaskStatus,
    /// 出错的文件数（含导致中断的那一个）
    pub errors: usize,
    /// 逐文件日志
    pub log: Vec<String>,
    /// 最后一个成功处理的目标路径
    pub last_path: Option<PathBuf>,
    /// 导致中断的路径
    pub failed_path: Option<PathBuf>,
    /// 已完成的重命名 (源, 目标)，仅正式执行时记录
    pub renamed: Vec<(PathBuf, PathBuf)>,
    /// 中断时尚未重命名的源文件
    pub remaining: Vec<PathBuf>,
    /// 是否因取消而停止
    pub cancelled: bool,
}

impl TaskResult {
    pub fn new(id: usize, status: TaskStatus) -> Self {
        TaskResult {
            id,
            status,
            errors: status.errors(),
            log: Vec::new(),
            last_path: None,
            failed_path: None,
            renamed: Vec::new(),
            remaining: Vec::new(),
            cancelled: false,
        }
    }

    pub fn errors(&self) -> usize {
        self.errors
    }
}

/// 一个阶段（预演或正式执行）的结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// 是否为预演
    pub dry_run: bool,
    /// 各任务结果（按处理顺序）
    pub results: Vec<TaskResult>,
    /// 已处理文件数
    pub files_processed: usize,
    /// 是否被取消
    pub cancelled: bool,
    /// 因取消而未处理的任务 ID
    pub unprocessed: Vec<usize>,
}

impl BatchReport {
    pub fn new(dry_run: bool) -> Self {
        BatchReport {
            dry_run,
            ..Default::default()
        }
    }

    /// 所有任务均为 Ready / NothingToChange 且未取消
    pub fn is_clean(&self) -> bool {
        !self.cancelled && self.results.iter().all(|r| r.status.is_clean())
    }

    /// 需要处理的任务 ID
    pub fn needs_attention(&self) -> Vec<usize> {
        self.results
            .iter()
            .filter(|r| !r.status.is_clean() && r.status != TaskStatus::Complete)
            .map(|r| r.id)
            .collect()
    }

    /// 指定状态的任务数
    pub fn count(&self, pred: impl Fn(&TaskStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }

    /// 所有任务的错误总数
    pub fn total_errors(&self) -> usize {
        self.results.iter().map(TaskResult::errors).sum()
    }

    /// 已重命名的全部文件
    pub fn renamed(&self) -> impl Iterator<Item = &(PathBuf, PathBuf)> {
        self.results.iter().flat_map(|r| r.renamed.iter())
    }
}

/// 预演 + 正式执行的完整结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub dry_run: BatchReport,
    /// 预演有错误或仅预演时为 `None`
    pub commit: Option<BatchReport>,
}

impl BatchOutcome {
    /// 最终生效的阶段结果
    pub fn last(&self) -> &BatchReport {
        self.commit.as_ref().unwrap_or(&self.dry_run)
    }
}

/// CSV 报告行
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    task: usize,
    path: String,
    before: &'a str,
    after: &'a str,
    status: String,
    errors: usize,
    log: String,
}

/// 写出任务结果 CSV 报告
pub fn write_csv_report(tasks: &[SequenceTask], report: &BatchReport, output: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output).map_err(SeqRenameError::CsvError)?;

    for result in &report.results {
        let Some(task) = tasks.get(result.id) else {
            continue;
        };
        wtr.serialize(ReportRow {
            task: result.id,
            path: task.path.display().to_string(),
            before: &task.before,
            after: &task.after,
            status: result.status.to_string(),
            errors: result.errors(),
            log: result.log.join("\n"),
        })
        .map_err(SeqRenameError::CsvError)?;
    }

    wtr.flush().map_err(|e| SeqRenameError::FileWriteError {
        path: output.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_accounting() {
        let mut report = BatchReport::new(true);
        report.results.push(TaskResult::new(0, TaskStatus::Ready));
        report.results.push(TaskResult::new(2, TaskStatus::NothingToChange));
        assert!(report.is_clean());

        report.results.push(TaskResult::new(3, TaskStatus::PartialError(2)));
        report.results.push(TaskResult::new(4, TaskStatus::Interrupted));
        assert!(!report.is_clean());
        assert_eq!(report.needs_attention(), vec![3, 4]);
        assert_eq!(report.total_errors(), 2);
        assert_eq!(report.count(|s| *s == TaskStatus::Ready), 1);
    }

    #[test]
    fn test_csv_report() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("report.csv");

        let tasks = vec![
            SequenceTask {
                path: PathBuf::from("/r"),
                before: "a.[1-2].exr".to_string(),
                after: "b.[1-2].exr".to_string(),
                ..Default::default()
            },
            SequenceTask {
                path: PathBuf::from("/r"),
                before: "c.[1-2].exr".to_string(),
                after: "d.[1-2].exr".to_string(),
                ..Default::default()
            },
        ];
        let mut report = BatchReport::new(false);
        let mut result = TaskResult::new(0, TaskStatus::PartialError(1));
        result.log.push("Source file does not exist: /r/a.2.exr".to_string());
        report.results.push(result);
        let mut stopped = TaskResult::new(1, TaskStatus::Interrupted);
        stopped.errors = 1;
        stopped.log.push("Interrupted".to_string());
        report.results.push(stopped);
        assert_eq!(report.total_errors(), 2);

        write_csv_report(&tasks, &report, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "task,path,before,after,status,errors,log"
        );
        assert!(content.contains("a.[1-2].exr,b.[1-2].exr,1 error,1,"));
        assert!(content.contains("c.[1-2].exr,d.[1-2].exr,Interrupted,1,Interrupted"));
    }
}
