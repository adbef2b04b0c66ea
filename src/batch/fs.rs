//! # 文件系统接口
//!
//! 批量重命名所需的最小文件系统操作：存在性检查与单次原子重命名。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `batch/worker.rs` 使用
//! - 无外部模块依赖

use crate::error::{Result, SeqRenameError};

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 批量重命名使用的文件系统操作
pub trait FileSystem: Send + Sync {
    /// 路径是否为已存在的常规文件
    fn is_file(&self, path: &Path) -> bool;

    /// 重命名单个文件，不做跨卷复制回退
    ///
    /// 错误须区分 `SourceMissing`、`DestinationExists` 与 `RenameFailed`。
    fn rename(&self, src: &Path, dst: &Path) -> Result<()>;
}

/// 本地文件系统
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn rename(&self, src: &Path, dst: &Path) -> Result<()> {
        if !src.exists() {
            return Err(SeqRenameError::SourceMissing {
                path: src.display().to_string(),
            });
        }
        // std::fs::rename 在 Unix 上会静默覆盖目标
        if src != dst && dst.exists() {
            return Err(SeqRenameError::DestinationExists {
                path: dst.display().to_string(),
            });
        }

        fs::rename(src, dst).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SeqRenameError::SourceMissing {
                path: src.display().to_string(),
            },
            ErrorKind::AlreadyExists => SeqRenameError::DestinationExists {
                path: dst.display().to_string(),
            },
            _ => SeqRenameError::RenameFailed {
                src: src.display().to_string(),
                dst: dst.display().to_string(),
                source: e,
            },
        })
    }
}
