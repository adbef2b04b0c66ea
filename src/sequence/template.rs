//! # 序列模板展开
//!
//! 将 `prefix[range]ext` 形式的模板展开为具体文件路径列表。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `commands/range.rs` 使用
//! - 使用 `sequence/range.rs` 解析帧号

use super::range;

use std::path::{Path, PathBuf};

/// 拆分模板为 (前缀, 范围, 扩展名)；括号不成对时返回 `None`
fn split_template(template: &str) -> Option<(&str, &str, &str)> {
    let mut parts = template.split(['[', ']']);
    let prefix = parts.next()?;
    let range = parts.next()?;
    let ext = parts.next()?;
    if parts.next().is_some() || !template[prefix.len()..].starts_with('[') {
        return None;
    }
    Some((prefix, range, ext))
}

/// 展开模板为文件路径列表
///
/// 帧号按范围字符串的书写顺序输出，补零宽度取最窄的数字。无括号、括号不成对或范围无法解析时，
/// 整个模板视为单个文件名。
pub fn expand_template(dir: &Path, template: &str) -> Vec<PathBuf> {
    let literal = || vec![dir.join(template)];

    let (prefix, range_str, ext) = match split_template(template) {
        Some(parts) => parts,
        None => return literal(),
    };

    let frames = match range::parse_frame_list(range_str) {
        Ok(Some(frames)) => frames,
        _ => return literal(),
    };

    let padding = range::range_padding(range_str);
    frames
        .into_iter()
        .map(|frame| {
            dir.join(format!(
                "{}{}{}",
                prefix,
                range::pad_frame(frame, padding),
                ext
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_expand_sequence() {
        let dir = Path::new("/renders");
        let paths = expand_template(dir, "shot.[0001-0003, 0010].exr");
        assert_eq!(
            names(&paths),
            vec!["shot.0001.exr", "shot.0002.exr", "shot.0003.exr", "shot.0010.exr"]
        );
        assert_eq!(paths[0], dir.join("shot.0001.exr"));
    }

    #[test]
    fn test_expand_written_order_and_step() {
        let paths = expand_template(Path::new("d"), "f_[0020, 0001-0002, 0005-0009x2].png");
        assert_eq!(
            names(&paths),
            vec!["f_0020.png", "f_0001.png", "f_0002.png", "f_0005.png", "f_0007.png", "f_0009.png"]
        );
    }

    #[test]
    fn test_expand_literal_fallbacks() {
        let dir = Path::new("d");
        assert_eq!(expand_template(dir, "notes.txt"), vec![dir.join("notes.txt")]);
        assert_eq!(expand_template(dir, "a[1-2"), vec![dir.join("a[1-2")]);
        assert_eq!(expand_template(dir, "a]1-2[b"), vec![dir.join("a]1-2[b")]);
        assert_eq!(expand_template(dir, "a[x-y]b"), vec![dir.join("a[x-y]b")]);
        assert_eq!(expand_template(dir, "a[]b"), vec![dir.join("a[]b")]);
        assert_eq!(expand_template(dir, "a[1][2]b"), vec![dir.join("a[1][2]b")]);
    }

    #[test]
    fn test_expand_unpadded_across_widths() {
        let paths = expand_template(Path::new("d"), "img[8-11].png");
        assert_eq!(
            names(&paths),
            vec!["img8.png", "img9.png", "img10.png", "img11.png"]
        );
        let paths = expand_template(Path::new("d"), "v[098-100].png");
        assert_eq!(names(&paths), vec!["v098.png", "v099.png", "v100.png"]);
    }
}
