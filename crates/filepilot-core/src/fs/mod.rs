//! File-system capability consumed by the bulk engine
//!
//! The engine never touches the disk directly. Everything goes through the
//! [`FileSystem`] trait:
//!
//! - [`LocalFileSystem`]: the real disk, with a recoverable-delete holding area
//! - [`MemoryFileSystem`]: an in-memory tree for previews and tests
//!
//! The edit model committed at the end of a batch lives in [`edit`].

pub mod edit;
mod local;
mod memory;
pub mod pattern;

pub use edit::{
    EditBatch, EditOperation, Position, Range, ReferenceEdit, TextEdit, apply_text_edits,
};
pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;

use crate::error::FsError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Metadata returned by [`FileSystem::stat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_directory: bool,
    /// Size in bytes (0 for directories)
    pub len: u64,
}

/// Capabilities the bulk engine needs from a file system.
///
/// Paths passed in and out are absolute. Implementations must be cheap to
/// share behind an `Arc`.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Files under `root` matching the glob `pattern`, sorted by path and
    /// capped at `max_results`. Conventional ignore folders are excluded.
    async fn find_matches(
        &self,
        root: &Path,
        pattern: &str,
        max_results: usize,
    ) -> Result<Vec<PathBuf>, FsError>;

    /// Metadata for `path`, or `None` if nothing exists there
    async fn stat(&self, path: &Path) -> Result<Option<FileStat>, FsError>;

    /// Whether anything exists at `path`
    async fn exists(&self, path: &Path) -> Result<bool, FsError> {
        Ok(self.stat(path).await?.is_some())
    }

    /// Read a text document
    async fn read_to_string(&self, path: &Path) -> Result<String, FsError>;

    /// Recoverable delete: move `path` into a holding area
    async fn delete(&self, path: &Path) -> Result<(), FsError>;

    /// Copy a file or folder; fails if `target` exists
    async fn copy(&self, source: &Path, target: &Path) -> Result<(), FsError>;

    /// Apply an edit batch as one unit. `Ok(false)` means the batch was
    /// rejected and nothing in it was applied; a file system that refuses
    /// writes altogether reports [`FsError::ReadOnly`].
    async fn commit_edit_batch(&self, batch: &EditBatch) -> Result<bool, FsError>;
}
