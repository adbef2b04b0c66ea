//! # 后台批量重命名线程
//!
//! 在单个后台线程上执行预演 → 正式执行，通过通道把事件发回调用线程。
//! 调用线程是任务列表的唯一写入者，按收到的 `TaskDone` 事件更新任务。
//!
//! ## 依赖关系
//! - 被 `commands/rename.rs` 使用
//! - 使用 `batch/runner.rs` 执行任务
//! - 使用 `crossbeam-channel` 传递事件

use super::fs::FileSystem;
use super::report::{BatchOutcome, BatchReport, TaskResult};
use super::runner::{BatchObserver, BatchOptions, BatchRenamer, CancelToken};
use crate::error::{Result, SeqRenameError};
use crate::models::SequenceTask;

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// 后台线程发出的事件
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Message(String),
    Error(String),
    /// 当前阶段累计已处理文件数
    Progress { dry_run: bool, files: usize },
    TaskDone { dry_run: bool, result: TaskResult },
    PhaseFinished(BatchReport),
    Finished(BatchOutcome),
}

/// 把执行事件转发到通道
struct ChannelObserver {
    tx: Sender<BatchEvent>,
    dry_run: bool,
}

impl ChannelObserver {
    fn send(&self, event: BatchEvent) {
        // 接收端已关闭时事件无人关心
        let _ = self.tx.send(event);
    }
}

impl BatchObserver for ChannelObserver {
    fn message(&mut self, msg: &str) {
        self.send(BatchEvent::Message(msg.to_string()));
    }

    fn error(&mut self, msg: &str) {
        self.send(BatchEvent::Error(msg.to_string()));
    }

    fn progress(&mut self, files: usize) {
        self.send(BatchEvent::Progress {
            dry_run: self.dry_run,
            files,
        });
    }

    fn task_done(&mut self, result: &TaskResult) {
        self.send(BatchEvent::TaskDone {
            dry_run: self.dry_run,
            result: result.clone(),
        });
    }

    fn phase_finished(&mut self, report: &BatchReport) {
        self.send(BatchEvent::PhaseFinished(report.clone()));
        // 下一阶段为正式执行
        self.dry_run = false;
    }
}

/// 运行中的后台任务句柄
pub struct BatchHandle {
    events: Receiver<BatchEvent>,
    cancel: CancelToken,
    thread: thread::JoinHandle<BatchOutcome>,
}

impl BatchHandle {
    /// 事件接收端；线程结束后通道关闭
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// 请求取消，在下一个文件之前生效
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// 等待线程结束
    pub fn join(self) -> Result<BatchOutcome> {
        self.thread
            .join()
            .map_err(|_| SeqRenameError::Other("Batch rename worker panicked".to_string()))
    }
}

/// 后台批量重命名
pub struct BatchWorker;

impl BatchWorker {
    /// 在后台线程上处理任务快照
    pub fn spawn<F>(tasks: Vec<SequenceTask>, options: BatchOptions, fs: Arc<F>) -> Result<BatchHandle>
    where
        F: FileSystem + 'static,
    {
        Self::spawn_with_cancel(tasks, options, fs, CancelToken::new())
    }

    /// 使用外部取消标记启动，便于在启动前接好信号处理
    pub fn spawn_with_cancel<F>(
        tasks: Vec<SequenceTask>,
        options: BatchOptions,
        fs: Arc<F>,
        cancel: CancelToken,
    ) -> Result<BatchHandle>
    where
        F: FileSystem + 'static,
    {
        let (tx, rx) = unbounded();
        let worker_cancel = cancel.clone();

        let thread = thread::Builder::new()
            .name("seqrename-worker".to_string())
            .spawn(move || {
                let renamer = BatchRenamer::new(fs.as_ref(), options).with_cancel(worker_cancel);
                let mut observer = ChannelObserver {
                    tx: tx.clone(),
                    dry_run: true,
                };
                let outcome = renamer.execute(&tasks, &mut observer);
                let _ = tx.send(BatchEvent::Finished(outcome.clone()));
                outcome
            })
            .map_err(|e| SeqRenameError::Other(format!("Failed to start worker thread: {}", e)))?;

        Ok(BatchHandle {
            events: rx,
            cancel,
            thread,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::runner::tests::{ready_task, RecordingFs};
    use crate::models::TaskStatus;
    use std::path::PathBuf;

    #[test]
    fn test_worker_streams_events() {
        let fs = Arc::new(RecordingFs::with_files(vec![
            PathBuf::from("/r/a.0001.exr"),
            PathBuf::from("/r/a.0002.exr"),
        ]));
        let tasks = vec![ready_task("/r", "a.[0001-0002].exr", "b.[0001-0002].exr")];

        let handle = BatchWorker::spawn(tasks, BatchOptions::default(), Arc::clone(&fs)).unwrap();
        let events: Vec<BatchEvent> = handle.events().iter().collect();
        let outcome = handle.join().unwrap();

        let done: Vec<(bool, TaskStatus)> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::TaskDone { dry_run, result } => Some((*dry_run, result.status)),
                _ => None,
            })
            .collect();
        assert_eq!(done, vec![(true, TaskStatus::Ready), (false, TaskStatus::Complete)]);
        assert!(matches!(events.last(), Some(BatchEvent::Finished(_))));
        assert_eq!(outcome.last().results[0].status, TaskStatus::Complete);
        assert_eq!(fs.renames.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_worker_cancelled_before_start() {
        let fs = Arc::new(RecordingFs::with_files(vec![PathBuf::from("/r/a.0001.exr")]));
        let tasks = vec![ready_task("/r", "a.[0001].exr", "b.[0001].exr")];

        let cancel = CancelToken::new();
        cancel.cancel();
        let handle =
            BatchWorker::spawn_with_cancel(tasks, BatchOptions::default(), Arc::clone(&fs), cancel)
                .unwrap();
        let outcome = handle.join().unwrap();

        assert!(outcome.dry_run.cancelled);
        assert_eq!(outcome.dry_run.results[0].status, TaskStatus::Interrupted);
        assert!(outcome.commit.is_none());
        assert!(fs.renames.lock().unwrap().is_empty());
    }

    /// 第 n 次重命名之后触发取消
    struct CancelAfter {
        inner: RecordingFs,
        cancel: CancelToken,
        after: usize,
    }

    impl FileSystem for CancelAfter {
        fn is_file(&self, path: &std::path::Path) -> bool {
            self.inner.is_file(path)
        }

        fn rename(&self, src: &std::path::Path, dst: &std::path::Path) -> Result<()> {
            let result = self.inner.rename(src, dst);
            if self.inner.renames.lock().unwrap().len() == self.after {
                self.cancel.cancel();
            }
            result
        }
    }

    #[test]
    fn test_worker_cancel_mid_commit() {
        let mut files: Vec<PathBuf> = (1..=3)
            .map(|n| PathBuf::from(format!("/r/a.{:04}.exr", n)))
            .collect();
        files.extend((1..=2).map(|n| PathBuf::from(format!("/r/c.{:04}.exr", n))));

        let cancel = CancelToken::new();
        let fs = Arc::new(CancelAfter {
            inner: RecordingFs::with_files(files),
            cancel: cancel.clone(),
            after: 2,
        });
        let tasks = vec![
            ready_task("/r", "a.[0001-0003].exr", "b.[0001-0003].exr"),
            ready_task("/r", "c.[0001-0002].exr", "d.[0001-0002].exr"),
        ];

        let handle =
            BatchWorker::spawn_with_cancel(tasks, BatchOptions::default(), Arc::clone(&fs), cancel)
                .unwrap();
        let events: Vec<BatchEvent> = handle.events().iter().collect();
        let outcome = handle.join().unwrap();

        assert!(outcome.dry_run.is_clean());
        let commit = outcome.commit.unwrap();
        assert!(commit.cancelled);
        assert_eq!(commit.unprocessed, vec![1]);

        let result = &commit.results[0];
        assert_eq!(result.status, TaskStatus::Interrupted);
        assert_eq!(
            result.renamed,
            vec![
                (PathBuf::from("/r/a.0001.exr"), PathBuf::from("/r/b.0001.exr")),
                (PathBuf::from("/r/a.0002.exr"), PathBuf::from("/r/b.0002.exr")),
            ]
        );
        assert_eq!(result.remaining, vec![PathBuf::from("/r/a.0003.exr")]);
        assert_eq!(result.last_path, Some(PathBuf::from("/r/b.0002.exr")));
        assert_eq!(fs.inner.renames.lock().unwrap().len(), 2);

        // 调用方收到的完成事件与最终结果一致
        let committed: Vec<&TaskResult> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::TaskDone { dry_run: false, result } => Some(result),
                _ => None,
            })
            .collect();
        assert_eq!(committed.len(), 1);
        assert!(committed[0].cancelled);
    }
}
