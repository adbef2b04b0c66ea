//! # 查找替换
//!
//! 对序列前缀执行文本查找替换，支持普通文本与正则表达式两种模式。
//!
//! ## 依赖关系
//! - 被 `models/params.rs` 使用
//! - 使用 `regex` crate

use crate::error::{Result, SeqRenameError};

use regex::{NoExpand, Regex, RegexBuilder};

/// 预编译的查找替换规则
#[derive(Debug, Clone)]
pub struct Replacer {
    pattern: Option<Regex>,
    replace: String,
    regex: bool,
}

impl Replacer {
    /// 编译查找替换规则
    ///
    /// `find` 为空时替换为恒等变换；非正则模式下 `find` 与 `replace`
    /// 都按字面处理。
    pub fn new(find: &str, replace: &str, ignore_case: bool, regex: bool) -> Result<Self> {
        if find.is_empty() {
            return Ok(Self {
                pattern: None,
                replace: replace.to_string(),
                regex,
            });
        }

        let source = if regex {
            find.to_string()
        } else {
            regex::escape(find)
        };

        let pattern = RegexBuilder::new(&source)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| SeqRenameError::InvalidPattern {
                pattern: find.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            pattern: Some(pattern),
            replace: replace.to_string(),
            regex,
        })
    }

    /// 是否会改变任何文本
    pub fn is_identity(&self) -> bool {
        self.pattern.is_none()
    }

    /// 对文本执行全部替换
    pub fn apply(&self, text: &str) -> String {
        match &self.pattern {
            None => text.to_string(),
            Some(pattern) if self.regex => pattern.replace_all(text, self.replace.as_str()).into_owned(),
            Some(pattern) => pattern.replace_all(text, NoExpand(&self.replace)).into_owned(),
        }
    }
}

/// 单次查找替换
pub fn replace_text(
    text: &str,
    find: &str,
    replace: &str,
    ignore_case: bool,
    regex: bool,
) -> Result<String> {
    Ok(Replacer::new(find, replace, ignore_case, regex)?.apply(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_replace() {
        assert_eq!(
            replace_text("shot010_comp.", "010", "020", false, false).unwrap(),
            "shot020_comp."
        );
        // 字面模式下 `.` 与 `$1` 不具特殊含义
        assert_eq!(
            replace_text("a.b.c", ".", "$1", false, false).unwrap(),
            "a$1b$1c"
        );
    }

    #[test]
    fn test_ignore_case() {
        assert_eq!(
            replace_text("Shot_SHOT_shot", "shot", "plate", true, false).unwrap(),
            "plate_plate_plate"
        );
        assert_eq!(
            replace_text("Shot_SHOT_shot", "shot", "plate", false, false).unwrap(),
            "Shot_SHOT_plate"
        );
    }

    #[test]
    fn test_regex_groups() {
        assert_eq!(
            replace_text("sh010_v003.", r"v(\d+)", "ver$1", false, true).unwrap(),
            "sh010_ver003."
        );
    }

    #[test]
    fn test_empty_find_is_identity() {
        let replacer = Replacer::new("", "anything", false, true).unwrap();
        assert!(replacer.is_identity());
        assert_eq!(replacer.apply("keep."), "keep.");
    }

    #[test]
    fn test_invalid_regex() {
        let result = Replacer::new("sh(", "x", false, true);
        assert!(matches!(result, Err(SeqRenameError::InvalidPattern { .. })));
        // 同样的文本在字面模式下合法
        assert!(Replacer::new("sh(", "x", false, false).is_ok());
    }
}
