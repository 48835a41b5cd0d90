//! Errors reported by file-system and reference capabilities

use super::types::{BulkOpError, UnifiedError};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for capability operations
#[derive(Debug, Error)]
pub enum FsError {
    /// The path does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path exists but must not
    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// A glob pattern could not be parsed
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The file system refuses writes
    #[error("File system is read-only")]
    ReadOnly,

    /// Any other I/O failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Wrap an I/O error, mapping the common kinds onto dedicated variants
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path),
            _ => Self::Io { path, source },
        }
    }
}

impl UnifiedError for FsError {
    fn error_code(&self) -> &str {
        match self {
            Self::NotFound(_) => "FS_NOT_FOUND",
            Self::AlreadyExists(_) => "FS_ALREADY_EXISTS",
            Self::InvalidPattern { .. } => "FS_INVALID_PATTERN",
            Self::ReadOnly => "FS_READ_ONLY",
            Self::Io { .. } => "FS_IO",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::NotFound(_) => "File not found",
            Self::AlreadyExists(_) => "File already exists",
            Self::InvalidPattern { message, .. } => message,
            Self::ReadOnly => "File system is read-only",
            Self::Io { .. } => "I/O error occurred",
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<FsError> for BulkOpError {
    fn from(err: FsError) -> Self {
        match err {
            FsError::InvalidPattern { .. } => BulkOpError::invalid_input(err.to_string()),
            other => {
                let code = other.error_code().to_string();
                BulkOpError::file_system(other.to_string(), code)
            }
        }
    }
}
