//! Error types for the client-storage adapter.
//!
//! Configuration errors are raised only while building an adapter; validation
//! errors are raised at the start of an operation, before any storage I/O.
//! Failures of the storage handle itself are carried through unmodified.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a storage handle.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage quota exceeded writing {key:?} (limit {limit_bytes} bytes)")]
    QuotaExceeded { key: String, limit_bytes: usize },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

/// Main error type for the adapter.
#[derive(Debug, Error)]
pub enum StashError {
    // Construction errors
    #[error("{message}")]
    Configuration { message: String },

    // Input errors
    #[error("{message}")]
    Validation {
        /// Name of the offending argument (`key`, `extra`, ...)
        field: String,
        message: String,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Storage handle errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, StashError>;

impl From<std::io::Error> for StashError {
    fn from(err: std::io::Error) -> Self {
        StashError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for StashError {
    fn from(err: serde_json::Error) -> Self {
        StashError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl StashError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        StashError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StashError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        StashError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether this error was raised while building an adapter.
    pub fn is_configuration(&self) -> bool {
        matches!(self, StashError::Configuration { .. })
    }

    /// Whether this error was raised by input validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, StashError::Validation { .. })
    }
}
