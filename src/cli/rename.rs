//! # rename 子命令 CLI 定义
//!
//! 批量重命名：查找替换前缀、重新编号、更换扩展名。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rename.rs`

use super::scan::DetectArgs;
use crate::batch::BatchOptions;
use crate::models::RenameParams;

use clap::Args;
use std::path::PathBuf;

/// rename 子命令参数
#[derive(Args, Debug)]
pub struct RenameArgs {
    #[command(flatten)]
    pub detect: DetectArgs,

    /// Text to find in the name prefix
    #[arg(short, long, default_value = "")]
    pub find: String,

    /// Replacement text
    #[arg(short = 'R', long, default_value = "")]
    pub replace: String,

    /// Case-insensitive find
    #[arg(short, long, default_value_t = false)]
    pub ignore_case: bool,

    /// Treat --find as a regular expression ($1 refers to groups)
    #[arg(long, default_value_t = false)]
    pub regex: bool,

    /// Renumber frames instead of keeping their values
    #[arg(long, default_value_t = false)]
    pub renumber: bool,

    /// First frame number when renumbering
    #[arg(long, default_value_t = 1)]
    pub start: u64,

    /// Frame increment when renumbering
    #[arg(long, default_value_t = 1)]
    pub step: u64,

    /// Zero padding width (default: keep each sequence's current width)
    #[arg(long)]
    pub padding: Option<usize>,

    /// Pad to the minimal width for the largest frame
    #[arg(long, default_value_t = false, conflicts_with = "padding")]
    pub autopad: bool,

    /// New file extension (without or with leading '.')
    #[arg(short, long)]
    pub ext: Option<String>,

    /// Only check the renames, do not touch any file
    #[arg(short = 'n', long, default_value_t = false)]
    pub dry_run: bool,

    /// Keep going after a failed file within a sequence
    #[arg(long, env = "SEQRENAME_IGNORE_ERRORS", default_value_t = false)]
    pub ignore_errors: bool,

    /// Write a CSV report of every processed sequence
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl RenameArgs {
    pub fn rename_params(&self) -> RenameParams {
        RenameParams {
            find: self.find.clone(),
            replace: self.replace.clone(),
            ignore_case: self.ignore_case,
            regex: self.regex,
            start: self.start,
            step: self.step,
            padding: self.padding,
            preserve: !self.renumber,
            autopad: self.autopad,
            change_ext: self.ext.is_some(),
            new_ext: self.ext.clone().unwrap_or_default(),
        }
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            dry_run: self.dry_run,
            ignore_errors: self.ignore_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use crate::models::RenameParams;
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args.iter().copied())
    }

    #[test]
    fn test_find_replace_keeps_numbering() {
        let cli = parse(&["seqrename", "rename", "plates", "--find", "shot", "--replace", "comp"]).unwrap();
        let Commands::Rename(args) = cli.command else {
            panic!("expected rename");
        };

        // 未给出编号参数时保持原有帧号与补零宽度
        let params = args.rename_params();
        assert_eq!(
            params,
            RenameParams {
                find: "shot".to_string(),
                replace: "comp".to_string(),
                ..Default::default()
            }
        );
        assert_eq!(params.padding, None);
        assert!(!params.autopad);
    }

    #[test]
    fn test_padding_options() {
        let cli = parse(&["seqrename", "rename", "plates", "--renumber", "--padding", "6"]).unwrap();
        let Commands::Rename(args) = cli.command else {
            panic!("expected rename");
        };
        let params = args.rename_params();
        assert_eq!(params.padding, Some(6));
        assert!(!params.preserve);

        assert!(parse(&["seqrename", "rename", "plates", "--autopad", "--padding", "4"]).is_err());
    }
}
