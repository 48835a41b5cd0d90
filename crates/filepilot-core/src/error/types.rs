//! Core error types and traits for the bulk engine

use thiserror::Error;

/// Result type alias for bulk operations
pub type BulkOpResult<T> = Result<T, BulkOpError>;

/// Unified error trait that all Filepilot errors implement.
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is retryable
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Stable classification of a [`BulkOpError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Untrusted,
    NoWorkspace,
    InvalidInput,
    FileNotFound,
    AlreadyExists,
    EditRejected,
    FileSystem,
}

impl ErrorKind {
    /// Wire code of this kind, e.g. `ALREADY_EXISTS`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Untrusted => "UNTRUSTED",
            Self::NoWorkspace => "NO_WORKSPACE",
            Self::InvalidInput => "INVALID_INPUT",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::EditRejected => "EDIT_REJECTED",
            Self::FileSystem => "FILESYSTEM",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by a bulk operation
///
/// The display text is the user-facing message and names the offending path
/// where there is one. Callers should present it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BulkOpError {
    /// The workspace is not trusted, so no file may be touched
    #[error("{message}")]
    Untrusted { message: String },

    /// No workspace root is available to resolve paths against
    #[error("{message}")]
    NoWorkspace { message: String },

    /// Empty pattern, malformed action or a path leaving the workspace
    #[error("{message}")]
    InvalidInput {
        message: String,
        context: Option<String>,
    },

    /// A required source is missing, or a pattern matched nothing
    #[error("{message}")]
    FileNotFound {
        message: String,
        path: Option<String>,
    },

    /// A computed target already exists or collides inside the batch
    #[error("{message}")]
    AlreadyExists { message: String, path: String },

    /// The final edit batch was refused by the file system
    #[error("{message}")]
    EditRejected { message: String },

    /// A capability failed while expanding or validating the batch
    #[error("{message}")]
    FileSystem {
        message: String,
        context: Option<String>,
    },
}

impl BulkOpError {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Untrusted { .. } => ErrorKind::Untrusted,
            Self::NoWorkspace { .. } => ErrorKind::NoWorkspace,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::EditRejected { .. } => ErrorKind::EditRejected,
            Self::FileSystem { .. } => ErrorKind::FileSystem,
        }
    }

    /// Path named by the error, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::FileNotFound { path, .. } => path.as_deref(),
            Self::AlreadyExists { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl UnifiedError for BulkOpError {
    fn error_code(&self) -> &str {
        self.kind().as_str()
    }

    fn message(&self) -> &str {
        match self {
            Self::Untrusted { message }
            | Self::NoWorkspace { message }
            | Self::InvalidInput { message, .. }
            | Self::FileNotFound { message, .. }
            | Self::AlreadyExists { message, .. }
            | Self::EditRejected { message }
            | Self::FileSystem { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { context, .. } | Self::FileSystem { context, .. } => {
                context.as_deref()
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::FileSystem { .. })
    }
}
