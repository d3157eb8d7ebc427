//! Error types for the planner core.
//!
//! Every failure is local to the operation that triggered it. Validation and
//! import errors carry the user-facing text that the notification channel
//! shows; storage errors carry the underlying cause.

use thiserror::Error;

/// Failures of the byte-level key-value substrate.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("LMDB error: {0}")]
    Lmdb(#[from] lmdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database environment is closed")]
    Closed,
}

/// A rejected mutation. The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}을(를) 입력해주세요.")]
    EmptyField(&'static str),

    #[error("이미 존재하는 과목입니다.")]
    DuplicateSubject,

    #[error("이미 존재하는 과목 이름입니다.")]
    DuplicateSubjectRename,

    #[error("회독 횟수는 0 미만이 될 수 없습니다.")]
    CountBelowZero,

    #[error("과목과 내용을 모두 입력해주세요.")]
    IncompleteNote,

    #[error("이미지는 2MB를 초과할 수 없습니다.")]
    ImageTooLarge { size: usize, limit: usize },

    #[error("지원하지 않는 이미지 형식입니다.")]
    UnsupportedImage,
}

/// Why an uploaded backup was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("backup is not valid UTF-8")]
    NotUtf8,

    #[error("backup is not valid JSON: {0}")]
    Malformed(String),

    #[error("backup root must be a JSON object")]
    NotAnObject,

    #[error("backup is missing required key `{0}`")]
    MissingKey(&'static str),

    #[error("backup field has an unexpected shape: {0}")]
    Shape(String),
}

/// Invalid environment overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Top-level error returned by [`crate::planner::StudyPlanner`].
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Import rejected: {0}")]
    Import(#[from] ImportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No confirmation is pending")]
    NothingPending,
}

pub type Result<T> = std::result::Result<T, PlannerError>;
