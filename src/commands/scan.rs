//! # scan 命令实现
//!
//! 检测输入中的文件序列并以表格列出。
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 使用 `batch/collector.rs` 收集序列
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::InputCollector;
use crate::cli::scan::{DetectArgs, ScanArgs};
use crate::error::Result;
use crate::sequence::Sequence;
use crate::utils::{output, progress};

use tabled::{Table, Tabled};

/// 序列列表行
#[derive(Debug, Clone, Tabled)]
struct SequenceRow {
    #[tabled(rename = "#")]
    id: usize,
    #[tabled(rename = "Directory")]
    dir: String,
    #[tabled(rename = "Sequence")]
    template: String,
    #[tabled(rename = "Files")]
    count: usize,
}

/// 执行 scan 命令
pub fn execute(args: ScanArgs) -> Result<()> {
    output::print_header("Scanning for Sequences");

    let sequences = collect_sequences(&args.detect)?;
    if sequences.is_empty() {
        output::print_warning("No sequences found");
        return Ok(());
    }

    let rows: Vec<SequenceRow> = sequences
        .iter()
        .enumerate()
        .map(|(id, seq)| SequenceRow {
            id,
            dir: seq.dir.display().to_string(),
            template: seq.template(),
            count: seq.count,
        })
        .collect();
    println!("{}", Table::new(&rows));

    let files: usize = sequences.iter().map(|s| s.count).sum();
    output::print_done(&format!(
        "Found {} sequence(s), {} file(s)",
        sequences.len(),
        files
    ));

    Ok(())
}

/// 收集输入中的序列，逐项失败只警告不中断
pub(crate) fn collect_sequences(args: &DetectArgs) -> Result<Vec<Sequence>> {
    let collector = InputCollector::new(args.inputs.clone(), args.detect_options())
        .with_pattern(args.pattern.as_deref())?
        .recursive(args.recursive)
        .jobs(args.jobs);

    let pb = progress::create_spinner("Detecting sequences...");
    let result = collector.collect_with(|| pb.tick())?;
    pb.finish_and_clear();

    for (path, err) in &result.failures {
        output::print_warning(&format!("{}: {}", path, err));
    }
    for seq in &result.sequences {
        output::print_detail(&format!(
            "{} ({} file(s))",
            seq.dir.join(seq.template()).display(),
            seq.count
        ));
    }

    Ok(result.sequences)
}
