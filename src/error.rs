//! Error types for omw
//!
//! Exit codes:
//! - 2: User error (bad date, bad config, empty log)
//! - 3: Blocked (timesheet locked by another omw process)
//! - 4: Operation failed (IO, decode, aggregation)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the omw CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for omw operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Can't parse report date '{0}': expected YYYY-M-D or RFC 3339 with offset")]
    InvalidDate(String),

    #[error("Invalid task text: {0:?}")]
    InvalidEncoding(String),

    #[error("Nothing to stretch: {0}")]
    EmptyLog(String),

    #[error("Got zero entries from edit - manually remove {0} to clear all tasks")]
    EmptyResult(PathBuf),

    // Blocked (exit code 3)
    #[error("Unable to get file lock: {0}")]
    LockFailed(PathBuf),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML formatting error, please try again: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("Can't encode timesheet: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entry {0} has both break and ignore set")]
    Aggregation(String),

    #[error("Editor failed: {0}")]
    Editor(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_)
            | Error::InvalidDate(_)
            | Error::InvalidEncoding(_)
            | Error::EmptyLog(_)
            | Error::EmptyResult(_) => exit_codes::USER_ERROR,

            Error::LockFailed(_) => exit_codes::BLOCKED,

            Error::Io(_)
            | Error::Decode(_)
            | Error::Encode(_)
            | Error::Json(_)
            | Error::Aggregation(_)
            | Error::Editor(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, when the error carries any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::LockFailed(path) | Error::EmptyResult(path) => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            Error::Aggregation(id) => Some(serde_json::json!({ "entry_id": id })),
            _ => None,
        }
    }
}

/// Result type alias for omw operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error body of the `--json` error envelope
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        let code = err.exit_code();
        JsonError {
            message: err.to_string(),
            code,
            kind: match code {
                exit_codes::USER_ERROR => "user_error",
                exit_codes::BLOCKED => "blocked",
                _ => "operation_failed",
            },
            details: err.details(),
        }
    }
}
