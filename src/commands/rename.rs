//! # rename 命令实现
//!
//! 批量重命名文件序列。
//!
//! ## 功能
//! - 收集序列并按参数计算新名称
//! - 预览表格与输出冲突检查
//! - 后台线程执行预演 → 正式执行，进度条显示
//! - Ctrl-C 在下一个文件之前取消
//! - 可选 CSV 报告
//!
//! ## 依赖关系
//! - 使用 `cli/rename.rs` 定义的参数
//! - 使用 `commands/scan.rs` 收集序列
//! - 使用 `batch/`, `models/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use super::scan::collect_sequences;
use crate::batch::{
    write_csv_report, BatchEvent, BatchOutcome, BatchWorker, CancelToken, LocalFs,
};
use crate::cli::rename::RenameArgs;
use crate::error::{Result, SeqRenameError};
use crate::models::{RenameRules, SequenceTask, TaskList, TaskStatus};
use crate::utils::{output, progress};

use std::sync::Arc;
use tabled::{Table, Tabled};

/// 预览表格行
#[derive(Debug, Clone, Tabled)]
struct PreviewRow {
    #[tabled(rename = "#")]
    id: usize,
    #[tabled(rename = "Directory")]
    dir: String,
    #[tabled(rename = "Before")]
    before: String,
    #[tabled(rename = "After")]
    after: String,
    #[tabled(rename = "Files")]
    count: usize,
    #[tabled(rename = "Status")]
    status: String,
}

/// 执行 rename 命令
pub fn execute(args: RenameArgs) -> Result<()> {
    if args.dry_run {
        output::print_header("Batch Rename (dry run)");
    } else {
        output::print_header("Batch Rename");
    }

    let params = args.rename_params();
    // 参数错误在访问磁盘之前报告
    let rules = RenameRules::new(&params)?;
    if rules.is_identity() {
        output::print_info("No rename rules given, nothing to change");
        return Ok(());
    }

    let detect_options = args.detect.detect_options();
    let sequences = collect_sequences(&args.detect)?;
    if sequences.is_empty() {
        output::print_warning("No sequences found");
        return Ok(());
    }

    let mut list = TaskList::new();
    for seq in sequences {
        list.add(seq);
    }
    let summary = list.refresh(&params)?;
    print_preview(list.tasks());

    if summary.conflicts > 0 {
        return Err(SeqRenameError::Conflict {
            count: summary.conflicts,
        });
    }
    if !list.can_commit() {
        output::print_info("Nothing to change");
        return Ok(());
    }

    output::print_info(&format!(
        "Rename {} of {} file(s)",
        summary.rename_count, summary.total_count
    ));

    // 报告使用执行前的 before/after
    let snapshot = list.tasks().to_vec();
    let cancel = CancelToken::new();
    let signal_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || signal_token.cancel()) {
        output::print_warning(&format!("Ctrl-C handler not installed: {}", e));
    }
    let handle = BatchWorker::spawn_with_cancel(
        snapshot.clone(),
        args.batch_options(),
        Arc::new(LocalFs),
        cancel,
    )?;

    let pb = progress::create_progress_bar(summary.rename_count as u64, "Dry run");
    for event in handle.events().iter() {
        match event {
            BatchEvent::Message(msg) => pb.suspend(|| output::print_detail(&msg)),
            BatchEvent::Error(msg) => pb.suspend(|| output::print_error(&msg)),
            BatchEvent::Progress { files, .. } => pb.set_position(files as u64),
            BatchEvent::TaskDone { dry_run, result } => {
                if !dry_run {
                    for (src, dst) in &result.renamed {
                        pb.suspend(|| {
                            output::print_rename(&src.display().to_string(), &dst.display().to_string())
                        });
                    }
                }
                list.apply_result(&result, &detect_options);
            }
            BatchEvent::PhaseFinished(report) => {
                if report.dry_run {
                    progress::reset_phase(&pb, "Renaming");
                }
            }
            BatchEvent::Finished(_) => break,
        }
    }
    pb.finish_and_clear();

    let outcome = handle.join()?;

    if let Some(path) = &args.report {
        write_csv_report(&snapshot, outcome.last(), path)?;
        output::print_success(&format!("Report saved to '{}'", path.display()));
    }

    summarize(&snapshot, &outcome, args.dry_run)
}

/// 打印预览表格
fn print_preview(tasks: &[SequenceTask]) {
    let rows: Vec<PreviewRow> = tasks
        .iter()
        .enumerate()
        .map(|(id, task)| PreviewRow {
            id,
            dir: task.path.display().to_string(),
            before: task.before.clone(),
            after: task.after.clone(),
            count: task.count,
            status: task.status.to_string(),
        })
        .collect();
    println!("{}", Table::new(&rows));
}

/// 打印执行结果；有任务需要处理时返回错误
fn summarize(tasks: &[SequenceTask], outcome: &BatchOutcome, dry_run: bool) -> Result<()> {
    let report = outcome.last();
    let attention = report.needs_attention();
    output::print_separator();

    for id in &attention {
        let Some(result) = report.results.iter().find(|r| r.id == *id) else {
            continue;
        };
        let name = tasks.get(*id).map(|t| t.before.as_str()).unwrap_or("?");
        output::print_warning(&format!("{}: {} ({})", id, name, result.status));
        for line in &result.log {
            output::print_detail(line);
        }
        if let Some(path) = &result.failed_path {
            output::print_detail(&format!("Failed at '{}'", path.display()));
        }
        if !result.remaining.is_empty() {
            output::print_detail(&format!("{} file(s) not renamed", result.remaining.len()));
        }
    }

    if report.cancelled {
        let remaining: usize = report.results.iter().map(|r| r.remaining.len()).sum::<usize>()
            + report
                .unprocessed
                .iter()
                .filter_map(|id| tasks.get(*id))
                .map(|t| t.count)
                .sum::<usize>();
        output::print_warning(&format!(
            "Cancelled, {} sequence(s) not processed",
            report.unprocessed.len()
        ));
        if !report.dry_run {
            output::print_info(&format!(
                "{} file(s) renamed, {} not renamed",
                report.renamed().count(),
                remaining
            ));
        }
    }

    if !attention.is_empty() {
        let errors = report.total_errors();
        if errors > 0 {
            output::print_error(&format!("{} error(s) reported", errors));
        }
        if outcome.commit.is_none() && !dry_run {
            output::print_skip("Dry run found problems, no files were renamed");
        }
        return Err(SeqRenameError::BatchFailed {
            count: attention.len(),
        });
    }

    if dry_run {
        output::print_done(&format!(
            "Dry run completed: {} sequence(s) ready, {} file(s) checked",
            report.count(|s| *s == TaskStatus::Ready),
            report.files_processed
        ));
    } else {
        output::print_done(&format!(
            "Renamed {} file(s) in {} sequence(s)",
            report.renamed().count(),
            report.count(|s| *s == TaskStatus::Complete)
        ));
    }

    Ok(())
}
