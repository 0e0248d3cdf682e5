//! Error types for smith
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad argument, nothing to select)
//! - 4: Operation failed (store I/O, lock contention, editor failure)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the smith CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for smith operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Nothing to select: the todolist is empty")]
    EmptySelection,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Import source error: {0}")]
    ImportSource(String),

    #[error("Editor failed: {0}")]
    EditorFailed(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidArgument(_) | Error::InvalidConfig(_) | Error::EmptySelection => {
                exit_codes::USER_ERROR
            }

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_)
            | Error::ImportSource(_)
            | Error::EditorFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for smith operations
pub type Result<T> = std::result::Result<T, Error>;
