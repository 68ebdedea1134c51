//! Error types for typesync-check

use std::path::PathBuf;
use thiserror::Error;

/// Result type for typesync-check operations.
pub type CheckResult<T> = Result<T, CheckError>;

/// Error type for typesync-check operations.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A required input directory does not exist.
    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    /// The directory + suffix pair did not form a valid glob pattern.
    #[error("invalid glob {pattern}: {message}")]
    Glob { pattern: String, message: String },
    /// Invalid audit options (e.g. an empty file suffix).
    #[error("Config error: {0}")]
    Config(String),
}

impl CheckError {
    /// Create an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckError::Io {
            path: path.into(),
            source,
        }
    }
}
