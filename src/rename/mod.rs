//! # 重命名规则模块
//!
//! 前缀查找替换与帧号重新编号。
//!
//! ## 依赖关系
//! - 被 `models/params.rs` 使用
//! - 子模块: replace, renumber

pub mod renumber;
pub mod replace;

pub use renumber::{renumber, RenumberOptions};
pub use replace::{replace_text, Replacer};
