//! Constructor methods for BulkOpError

use super::types::BulkOpError;
use std::fmt::Display;

impl BulkOpError {
    /// The workspace is not trusted
    pub fn untrusted() -> Self {
        Self::Untrusted {
            message: "Workspace is not trusted. File operations are disabled until the workspace is trusted.".to_string(),
        }
    }

    /// No workspace folder is open
    pub fn no_workspace() -> Self {
        Self::NoWorkspace {
            message: "No workspace folder is open. Open a folder to perform file operations."
                .to_string(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            context: None,
        }
    }

    /// Create an invalid input error with context
    pub fn invalid_input_with_context(
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// A source path does not exist; the whole batch is aborted
    pub fn file_not_found(path: impl Display) -> Self {
        Self::FileNotFound {
            message: format!(
                "File not found: {}. No changes were made; the whole batch was aborted.",
                path
            ),
            path: Some(path.to_string()),
        }
    }

    /// Pattern expansion produced nothing to operate on
    pub fn no_matches() -> Self {
        Self::FileNotFound {
            message: "No files matched the specified patterns.".to_string(),
            path: None,
        }
    }

    /// A target path already exists; the whole batch is aborted
    pub fn already_exists(path: impl Display) -> Self {
        Self::AlreadyExists {
            message: format!(
                "Target already exists: {}. No changes were made; the whole batch was aborted to avoid overwriting it.",
                path
            ),
            path: path.to_string(),
        }
    }

    /// Two actions in one batch produce the same target
    pub fn target_collision(path: impl Display) -> Self {
        Self::AlreadyExists {
            message: format!(
                "More than one operation targets {}. No changes were made; the whole batch was aborted.",
                path
            ),
            path: path.to_string(),
        }
    }

    /// The edit batch was refused on commit
    pub fn edit_rejected() -> Self {
        Self::EditRejected {
            message: "The rename/move changes were rejected; files may be read-only.".to_string(),
        }
    }

    /// Create a file-system error with context
    pub fn file_system(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::FileSystem {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Append a note to the user-facing message
    pub(crate) fn with_note(mut self, note: impl Display) -> Self {
        match &mut self {
            Self::Untrusted { message }
            | Self::NoWorkspace { message }
            | Self::InvalidInput { message, .. }
            | Self::FileNotFound { message, .. }
            | Self::AlreadyExists { message, .. }
            | Self::EditRejected { message }
            | Self::FileSystem { message, .. } => {
                message.push(' ');
                message.push_str(&note.to_string());
            }
        }
        self
    }
}
