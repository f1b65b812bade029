//! Error types shared across SwingSync crates.

use std::path::PathBuf;

/// Top-level error type for SwingSync operations.
#[derive(Debug, thiserror::Error)]
pub enum SwingsyncError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Analysis result not found: {id}")]
    ResultNotFound { id: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SwingsyncError.
pub type SwingsyncResult<T> = Result<T, SwingsyncError>;

impl SwingsyncError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn result_not_found(id: impl Into<String>) -> Self {
        Self::ResultNotFound { id: id.into() }
    }
}
