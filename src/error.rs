//! # 统一错误处理模块
//!
//! 定义 multiplet-kit 的所有错误类型，使用 `thiserror` 派生。
//! 分为四类：用户输入、I/O、格式解析、外部进程。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// multiplet-kit 统一错误类型
#[derive(Error, Debug)]
pub enum MultipletError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
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

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 格式错误
    // ─────────────────────────────────────────────────────────────
    #[error("{path}:{line}: {reason}")]
    FormatError {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Invalid parameter file: {path}\nReason: {source}")]
    ParamsError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize parameters: {0}")]
    ParamsSerializeError(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // 用户输入错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Another multiplet run is already using {path} (remove the lock file if it is stale)")]
    RunInProgress { path: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found")]
    CommandNotFound { command: String },

    #[error("Multiplet calculation failed with exit code {code}")]
    ProcessFailed { code: i32 },

    #[error("Multiplet calculation was terminated without an exit code")]
    ProcessKilled,

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl MultipletError {
    /// 构造带行号的格式错误
    pub fn format(path: &str, line: usize, reason: impl Into<String>) -> Self {
        MultipletError::FormatError {
            path: path.to_string(),
            line,
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MultipletError>;
