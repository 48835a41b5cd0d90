//! Reference resolution for renames and moves
//!
//! When a file is renamed, other files that import it need their import
//! specifiers rewritten. The bulk engine asks an injected
//! [`ReferenceResolver`] for those edits; the resolver may decline a file type
//! via [`ReferenceResolver::supports`] or return nothing at all, in which case
//! the rename simply proceeds without reference edits.

mod imports;

pub use imports::ImportReferenceResolver;

use crate::error::FsError;
use crate::fs::{Position, ReferenceEdit};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One rename or move the resolver should compute reference edits for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRequest {
    /// Absolute path before the rename
    pub old_path: PathBuf,
    /// Absolute path after the rename
    pub new_path: PathBuf,
    /// Position inside the old file the rename is anchored at
    pub anchor: Position,
    /// New base name of the file, without extension
    pub new_identifier: String,
}

impl RenameRequest {
    /// Build a request anchored at the start of the file
    pub fn new(old_path: impl Into<PathBuf>, new_path: impl Into<PathBuf>) -> Self {
        let new_path = new_path.into();
        let new_identifier = new_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            old_path: old_path.into(),
            new_path,
            anchor: Position::default(),
            new_identifier,
        }
    }
}

/// Capability computing the edits that keep references valid after a rename
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    /// Whether references to `path` can be resolved at all
    fn supports(&self, path: &Path) -> bool {
        let _ = path;
        true
    }

    /// Edits needed elsewhere in the project, or `None` if there are none
    async fn resolve_rename_references(
        &self,
        request: &RenameRequest,
    ) -> Result<Option<ReferenceEdit>, FsError>;
}
