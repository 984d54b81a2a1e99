//! Error types for the colsense library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for colsense operations.
#[derive(Debug, Error)]
pub enum ColsenseError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Snapshot format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Statistics that violate the context invariants.
    #[error("Invalid statistics for '{column}': {message}")]
    InvalidStatistics { column: String, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A runner was built without any rules.
    #[error("Running inference with an empty ruleset would produce no result")]
    EmptyRuleset,
}

impl ColsenseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ColsenseError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_statistics(column: impl ToString, message: impl Into<String>) -> Self {
        ColsenseError::InvalidStatistics {
            column: column.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for colsense operations.
pub type Result<T> = std::result::Result<T, ColsenseError>;
