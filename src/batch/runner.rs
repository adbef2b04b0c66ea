//! # 批量重命名执行器
//!
//! 顺序执行一组任务的重命名：先预演（只检查不修改），预演全部通过后才正式执行。
//!
//! ## 功能
//! - 将 before/after 模板展开为逐文件的 (源, 目标) 列表
//! - 预演：检查源文件存在、目标文件不存在
//! - 正式执行：逐文件调用一次原子重命名
//! - 错误计数与 `ignore_errors` 中断规则
//! - 全批次累计的进度回调，逐任务完成回调
//! - 协作式取消（每个文件之前检查）
//!
//! ## 依赖关系
//! - 被 `batch/worker.rs`, `commands/rename.rs` 调用
//! - 使用 `batch/fs.rs` 访问文件系统
//! - 使用 `sequence/template.rs` 展开模板

use super::fs::FileSystem;
use super::report::{BatchOutcome, BatchReport, TaskResult};
use crate::error::SeqRenameError;
use crate::models::{SequenceTask, TaskStatus};
use crate::sequence::expand_template;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 执行选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// 仅预演
    pub dry_run: bool,
    /// 出错时继续处理同一任务的剩余文件
    pub ignore_errors: bool,
}

/// 协作式取消标记
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 执行过程中的事件接收者，默认全部忽略
pub trait BatchObserver {
    /// 一般消息
    fn message(&mut self, _msg: &str) {}

    /// 逐文件错误
    fn error(&mut self, _msg: &str) {}

    /// 本阶段累计已处理文件数
    fn progress(&mut self, _files_processed: usize) {}

    /// 单个任务完成
    fn task_done(&mut self, _result: &TaskResult) {}

    /// 一个阶段结束
    fn phase_finished(&mut self, _report: &BatchReport) {}
}

/// 不接收任何事件
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// 由两个闭包组成的接收者
struct Callbacks<P, D> {
    on_progress: P,
    on_task_done: D,
}

impl<P, D> BatchObserver for Callbacks<P, D>
where
    P: FnMut(usize),
    D: FnMut(&TaskResult),
{
    fn progress(&mut self, files_processed: usize) {
        (self.on_progress)(files_processed)
    }

    fn task_done(&mut self, result: &TaskResult) {
        (self.on_task_done)(result)
    }
}

/// 批量重命名执行器
pub struct BatchRenamer<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    options: BatchOptions,
    cancel: CancelToken,
}

impl<'a, F: FileSystem + ?Sized> BatchRenamer<'a, F> {
    pub fn new(fs: &'a F, options: BatchOptions) -> Self {
        Self {
            fs,
            options,
            cancel: CancelToken::new(),
        }
    }

    /// 使用外部取消标记
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// 按选项执行一个阶段（预演或正式执行）
    pub fn run_batch<P, D>(&self, tasks: &[SequenceTask], on_progress: P, on_task_done: D) -> BatchReport
    where
        P: FnMut(usize),
        D: FnMut(&TaskResult),
    {
        let mut observer = Callbacks {
            on_progress,
            on_task_done,
        };
        self.run_phase(tasks, self.options.dry_run, &mut observer)
    }

    /// 预演 → 正式执行
    ///
    /// 预演中任一任务出错（或被取消）、或没有需要改名的任务时跳过正式执行，
    /// 不触碰任何文件。
    /// `options.dry_run` 为真时只执行预演。
    pub fn execute(&self, tasks: &[SequenceTask], observer: &mut dyn BatchObserver) -> BatchOutcome {
        let dry_run = self.run_phase(tasks, true, observer);
        let ready = dry_run.count(|s| *s == TaskStatus::Ready);
        if self.options.dry_run || ready == 0 || !dry_run.is_clean() {
            return BatchOutcome {
                dry_run,
                commit: None,
            };
        }

        let commit = self.run_phase(tasks, false, observer);
        BatchOutcome {
            dry_run,
            commit: Some(commit),
        }
    }

    /// 执行一个阶段，只处理状态为 `Ready` 的任务
    pub fn run_phase(
        &self,
        tasks: &[SequenceTask],
        dry_run: bool,
        observer: &mut dyn BatchObserver,
    ) -> BatchReport {
        let mut report = BatchReport::new(dry_run);

        for (id, task) in tasks.iter().enumerate() {
            if task.status != TaskStatus::Ready {
                continue;
            }
            if report.cancelled {
                report.unprocessed.push(id);
                continue;
            }

            let result = self.rename_task(id, task, dry_run, &mut report.files_processed, observer);
            report.cancelled = result.cancelled;
            observer.task_done(&result);
            report.results.push(result);
        }

        if dry_run {
            observer.message("Dry run completed.");
        } else {
            observer.message("Batch rename job completed.");
        }
        observer.phase_finished(&report);
        report
    }

    /// 预演检查单个文件，返回全部问题（可能同时有两个）
    fn verify(&self, src: &Path, dst: &Path) -> Vec<SeqRenameError> {
        let mut problems = Vec::new();
        if !self.fs.is_file(src) {
            problems.push(SeqRenameError::SourceMissing {
                path: src.display().to_string(),
            });
        }
        if src != dst && self.fs.is_file(dst) {
            problems.push(SeqRenameError::DestinationExists {
                path: dst.display().to_string(),
            });
        }
        problems
    }

    /// 处理单个任务的全部文件
    fn rename_task(
        &self,
        id: usize,
        task: &SequenceTask,
        dry_run: bool,
        files_processed: &mut usize,
        observer: &mut dyn BatchObserver,
    ) -> TaskResult {
        if task.before == task.after {
            return TaskResult::new(id, TaskStatus::NothingToChange);
        }

        let mut result = TaskResult::new(id, TaskStatus::Ready);
        let src_list = expand_template(&task.path, &task.before);
        let dst_list = expand_template(&task.path, &task.after);

        let msg = format!("{}: Rename '{}' to '{}'", id, task.before, task.after);
        if dry_run {
            observer.message(&format!("[Dry run] {}", msg));
        } else {
            observer.message(&msg);
        }

        if src_list.len() != dst_list.len() {
            let msg = format!(
                "File count mismatch: {} source(s), {} destination(s)",
                src_list.len(),
                dst_list.len()
            );
            observer.error(&msg);
            result.log.push(msg);
            result.status = TaskStatus::Interrupted;
            result.errors = 1;
            result.failed_path = src_list.first().cloned();
            if !dry_run {
                result.remaining = src_list;
            }
            return result;
        }

        let mut errors = 0;
        let mut last_index = None;

        for (i, (src, dst)) in src_list.iter().zip(&dst_list).enumerate() {
            if self.cancel.is_cancelled() {
                result.log.push(format!("Cancelled before '{}'", src.display()));
                result.status = TaskStatus::Interrupted;
                result.errors = errors;
                result.cancelled = true;
                result.last_path = last_index.map(|n: usize| dst_list[n].clone());
                if !dry_run {
                    result.remaining = src_list[i..].to_vec();
                }
                return result;
            }

            let problems = if dry_run {
                self.verify(src, dst)
            } else {
                match self.fs.rename(src, dst) {
                    Ok(()) => Vec::new(),
                    Err(e) => vec![e],
                }
            };

            if problems.is_empty() {
                if !dry_run {
                    result
                        .log
                        .push(format!("'{}' -> '{}'", src.display(), dst.display()));
                    result.renamed.push((src.clone(), dst.clone()));
                }
                last_index = Some(i);
            } else {
                errors += 1;
                for problem in &problems {
                    let msg = problem.to_string();
                    observer.error(&msg);
                    result.log.push(msg);
                }

                if !self.options.ignore_errors {
                    result.status = TaskStatus::Interrupted;
                    result.errors = errors;
                    result.failed_path = Some(failing_path(&problems[0], src, dst));
                    result.last_path = last_index.map(|n| dst_list[n].clone());
                    if !dry_run {
                        result.remaining = src_list[i..].to_vec();
                    }
                    result.log.push(result.status.to_string());
                    return result;
                }
            }

            *files_processed += 1;
            observer.progress(*files_processed);
        }

        result.status = match (errors, dry_run) {
            (0, true) => TaskStatus::Ready,
            (0, false) => TaskStatus::Complete,
            (n, _) => TaskStatus::PartialError(n),
        };
        result.errors = errors;
        if errors > 0 {
            observer.message(&format!("Task generated {}.", result.status));
        }
        result.log.push(result.status.to_string());
        result.last_path = last_index.map(|n| dst_list[n].clone());
        result
    }
}

/// 错误对应的路径
fn failing_path(error: &SeqRenameError, src: &Path, dst: &Path) -> PathBuf {
    match error {
        SeqRenameError::DestinationExists { .. } => dst.to_path_buf(),
        _ => src.to_path_buf(),
    }
}
