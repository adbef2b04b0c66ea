//! # seqrename - 编号文件序列批量重命名工具
//!
//! ## 子命令
//! - `scan`   - 检测并列出序列
//! - `rename` - 批量重命名（查找替换、重新编号、更换扩展名）
//! - `range`  - 帧范围工具
//!   - `expand`   - 范围字符串展开
//!   - `compress` - 帧号压缩
//!   - `files`    - 模板展开为文件路径

use clap::Parser;
use seqrename::cli::Cli;
use seqrename::{commands, utils};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::output::set_verbose(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
