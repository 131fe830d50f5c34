//! Error types for habit
//!
//! Exit codes:
//! - 0: Success
//! - 2: Validation error (bad args, bad title, bad config)
//! - 3: Not found (task missing or owned by someone else)
//! - 4: Storage failure (io, lock timeout, corrupt store)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the habit CLI
pub mod exit_codes {
    pub const VALIDATION_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const STORAGE_FAILED: i32 = 4;
}

/// Coarse error classes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Storage,
}

/// Main error type for habit operations
#[derive(Error, Debug)]
pub enum Error {
    // Not found (exit code 3)
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    // Validation errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Storage failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Corrupt store: {0}")]
    CorruptStore(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TaskNotFound(_) => ErrorKind::NotFound,

            Error::InvalidArgument(_)
            | Error::InvalidTitle(_)
            | Error::InvalidDate(_)
            | Error::InvalidConfig(_) => ErrorKind::Validation,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::CorruptStore(_) => ErrorKind::Storage,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Validation => exit_codes::VALIDATION_ERROR,
            ErrorKind::NotFound => exit_codes::NOT_FOUND,
            ErrorKind::Storage => exit_codes::STORAGE_FAILED,
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(task_id) => Some(serde_json::json!({ "task_id": task_id })),
            Error::InvalidDate(raw) => Some(serde_json::json!({ "input": raw })),
            Error::InvalidArgument(message)
            | Error::InvalidTitle(message)
            | Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            Error::LockFailed(path) => Some(serde_json::json!({ "path": path })),
            _ => None,
        }
    }
}

/// Result type alias for habit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
