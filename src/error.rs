//! # 统一错误处理模块
//!
//! 定义 seqrename 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// seqrename 统一错误类型
#[derive(Error, Debug)]
pub enum SeqRenameError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read directory: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 重命名错误（逐文件记录）
    // ─────────────────────────────────────────────────────────────
    #[error("Source file does not exist: {path}")]
    SourceMissing { path: String },

    #[error("Destination file exists and would be overwritten: {path}")]
    DestinationExists { path: String },

    #[error("Failed to rename '{src}' -> '{dst}': {source}")]
    RenameFailed {
        src: String,
        dst: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{count} sequence(s) need attention, see messages above")]
    BatchFailed { count: usize },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{count} output filename conflict(s) found")]
    Conflict { count: usize },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No sequences found in: {path}")]
    NoSequencesFound { path: String },

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SeqRenameError>;
