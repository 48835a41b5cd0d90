//! Error types for tool operations

use filepilot_core::{BulkOpError, UnifiedError};

/// Error type for tool operations
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid arguments provided to the tool
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A file operation was refused; the message is shown verbatim
    #[error("{message}")]
    Operation { code: String, message: String },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UnifiedError for ToolError {
    fn error_code(&self) -> &str {
        match self {
            ToolError::InvalidArguments(_) => "TOOL_INVALID_ARGS",
            ToolError::Operation { code, .. } => code,
            ToolError::Json(_) => "TOOL_JSON_ERROR",
        }
    }

    fn message(&self) -> &str {
        match self {
            ToolError::InvalidArguments(msg) => msg,
            ToolError::Operation { message, .. } => message,
            ToolError::Json(_) => "JSON error occurred",
        }
    }
}

impl From<BulkOpError> for ToolError {
    fn from(err: BulkOpError) -> Self {
        ToolError::Operation {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}
