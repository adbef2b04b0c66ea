//! # range 命令实现
//!
//! 帧范围字符串与帧号、模板与文件路径之间的转换。
//!
//! ## 依赖关系
//! - 使用 `cli/range.rs` 定义的参数
//! - 使用 `sequence/range.rs`, `sequence/template.rs`

use crate::cli::range::{CompressArgs, ExpandArgs, FilesArgs, RangeArgs, RangeCommands};
use crate::error::{Result, SeqRenameError};
use crate::sequence::{encode_range_string, expand_template, parse_frame_list, parse_range_string};
use crate::utils::output;

/// 执行 range 命令
pub fn execute(args: RangeArgs) -> Result<()> {
    match args.command {
        RangeCommands::Expand(expand_args) => expand(expand_args),
        RangeCommands::Compress(compress_args) => compress(compress_args),
        RangeCommands::Files(files_args) => files(files_args),
    }
}

fn expand(args: ExpandArgs) -> Result<()> {
    let frames: Option<Vec<u64>> = if args.unsorted {
        parse_frame_list(&args.range)?
    } else {
        parse_range_string(&args.range)?.map(|set| set.into_iter().collect())
    };

    let Some(frames) = frames else {
        output::print_warning("Range is empty");
        return Ok(());
    };

    for frame in &frames {
        println!("{}", frame);
    }
    output::print_detail(&format!("{} frame(s)", frames.len()));
    Ok(())
}

fn compress(args: CompressArgs) -> Result<()> {
    let joined = args.numbers.join(" ");
    let frames = parse_range_string(&joined)?
        .ok_or_else(|| SeqRenameError::InvalidRange("no frame numbers given".to_string()))?;

    println!("{}", encode_range_string(frames, args.padding));
    Ok(())
}

fn files(args: FilesArgs) -> Result<()> {
    let paths = expand_template(&args.dir, &args.template);

    let mut missing = 0;
    for path in &paths {
        println!("{}", path.display());
        if !path.is_file() {
            missing += 1;
        }
    }

    output::print_detail(&format!("{} path(s), {} missing on disk", paths.len(), missing));
    Ok(())
}
