//! # 输出冲突检测
//!
//! 找出重命名后输出路径相同（忽略大小写）的任务：
//! 整个模板相同，或不同模板展开后有文件重叠（e.g. `x.[1-5]` 与 `x.[3-7]`）。
//!
//! ## 依赖关系
//! - 被 `models/task.rs`, `commands/rename.rs` 使用
//! - 使用 `sequence/template.rs` 展开输出模板

use crate::models::{SequenceTask, TaskStatus};
use crate::sequence::expand_template;

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

/// 词法规范化路径（不访问文件系统）
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// 任务输出路径的冲突键
pub fn conflict_key(task: &SequenceTask) -> String {
    normalize_path(&task.path.join(&task.after))
        .to_string_lossy()
        .to_lowercase()
}

/// 返回出现不止一次的输出键
pub fn find_conflicts(tasks: &[SequenceTask]) -> HashSet<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for task in tasks {
        *counts.entry(conflict_key(task)).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(key, _)| key)
        .collect()
}

/// 展开后的单个输出文件键
fn file_key(path: &Path) -> String {
    normalize_path(path).to_string_lossy().to_lowercase()
}

/// 模板不同但输出文件重叠的任务
///
/// 跳过 `skip` 中的模板键（已由 `find_conflicts` 报告），返回
/// (重叠的文件键, 涉及的任务下标)。
pub fn find_file_overlaps(
    tasks: &[SequenceTask],
    skip: &HashSet<String>,
) -> (HashSet<String>, HashSet<usize>) {
    let mut owners: HashMap<String, usize> = HashMap::new();
    let mut files = HashSet::new();
    let mut ids = HashSet::new();

    for (id, task) in tasks.iter().enumerate() {
        if skip.contains(&conflict_key(task)) {
            continue;
        }
        for path in expand_template(&task.path, &task.after) {
            let key = file_key(&path);
            match owners.get(&key) {
                Some(&owner) if owner != id => {
                    ids.insert(owner);
                    ids.insert(id);
                    files.insert(key);
                }
                Some(_) => {}
                None => {
                    owners.insert(key, id);
                }
            }
        }
    }
    (files, ids)
}

/// 将冲突任务标记为 `Conflict`
///
/// 返回冲突数：相同模板按模板计一次，模板不同的重叠按文件计数。
pub fn mark_conflicts(tasks: &mut [SequenceTask]) -> usize {
    let conflicts = find_conflicts(tasks);
    let (overlaps, overlap_ids) = find_file_overlaps(tasks, &conflicts);
    if conflicts.is_empty() && overlaps.is_empty() {
        return 0;
    }
    for (id, task) in tasks.iter_mut().enumerate() {
        if overlap_ids.contains(&id) || conflicts.contains(&conflict_key(task)) {
            task.status = TaskStatus::Conflict;
        }
    }
    conflicts.len() + overlaps.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(path: &str, after: &str, status: TaskStatus) -> SequenceTask {
        SequenceTask {
            path: PathBuf::from(path),
            after: after.to_string(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_case_insensitive_conflict() {
        let mut tasks = vec![
            task("/r", "Shot.[0001-0010].exr", TaskStatus::Ready),
            task("/r", "shot.[0001-0010].EXR", TaskStatus::Ready),
            task("/r", "plate.[0001-0010].exr", TaskStatus::Ready),
        ];

        let conflicts = find_conflicts(&tasks);
        assert_eq!(conflicts.len(), 1);

        assert_eq!(mark_conflicts(&mut tasks), 1);
        assert_eq!(tasks[0].status, TaskStatus::Conflict);
        assert_eq!(tasks[1].status, TaskStatus::Conflict);
        assert_eq!(tasks[2].status, TaskStatus::Ready);
    }

    #[test]
    fn test_normalized_paths_conflict() {
        let tasks = vec![
            task("/r/a/../b", "x.[1-2].exr", TaskStatus::Ready),
            task("/r/./b", "x.[1-2].exr", TaskStatus::NothingToChange),
        ];
        assert_eq!(find_conflicts(&tasks).len(), 1);
    }

    #[test]
    fn test_no_conflicts() {
        let mut tasks = vec![
            task("/r/a", "x.[1-2].exr", TaskStatus::Ready),
            task("/r/b", "x.[1-2].exr", TaskStatus::Ready),
        ];
        assert_eq!(mark_conflicts(&mut tasks), 0);
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Ready));
    }

    #[test]
    fn test_overlapping_ranges_conflict() {
        let mut tasks = vec![
            task("/r", "x.[1-5].exr", TaskStatus::Ready),
            task("/r", "X.[3-7].exr", TaskStatus::Ready),
            task("/r", "x.[8-9].exr", TaskStatus::Ready),
        ];
        assert!(find_conflicts(&tasks).is_empty());

        // 帧 3、4、5 重叠
        assert_eq!(mark_conflicts(&mut tasks), 3);
        assert_eq!(tasks[0].status, TaskStatus::Conflict);
        assert_eq!(tasks[1].status, TaskStatus::Conflict);
        assert_eq!(tasks[2].status, TaskStatus::Ready);
    }

    #[test]
    fn test_identical_templates_counted_once() {
        let mut tasks = vec![
            task("/r", "x.[1-5].exr", TaskStatus::Ready),
            task("/r", "x.[1-5].exr", TaskStatus::Ready),
        ];
        assert_eq!(mark_conflicts(&mut tasks), 1);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
    }
}
