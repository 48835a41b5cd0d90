//! In-memory file system for previews and tests

use super::edit::{EditBatch, RenameMap, apply_text_edits};
use super::pattern::{MATCH_OPTIONS, compile};
use super::{FileStat, FileSystem};
use crate::error::FsError;
use crate::workspace::to_slash;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// [`FileSystem`] holding text files in a map keyed by absolute path.
///
/// Folders exist implicitly when some file lives below them. Deleted files are
/// kept in a holding list and can be inspected with [`MemoryFileSystem::deleted`].
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
    deleted: Mutex<Vec<(PathBuf, String)>>,
    read_only: AtomicBool,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a file system from `(path, content)` pairs
    pub fn with_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.insert(path, content);
        }
        fs
    }

    /// Create or overwrite a file
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.lock().insert(path.into(), content.into());
    }

    /// Drop a file without going through the holding list
    pub fn remove(&self, path: &Path) -> Option<String> {
        self.files.lock().remove(path)
    }

    /// Current content of a file
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().get(path).cloned()
    }

    /// All file paths, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().keys().cloned().collect()
    }

    /// Paths moved to the holding list, in deletion order
    pub fn deleted(&self) -> Vec<PathBuf> {
        self.deleted.lock().iter().map(|(p, _)| p.clone()).collect()
    }

    /// Refuse every edit batch from now on
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn stat_in(files: &BTreeMap<PathBuf, String>, path: &Path) -> Option<FileStat> {
        if let Some(content) = files.get(path) {
            return Some(FileStat {
                is_directory: false,
                len: content.len() as u64,
            });
        }
        files
            .keys()
            .any(|p| p != path && p.starts_with(path))
            .then_some(FileStat {
                is_directory: true,
                len: 0,
            })
    }

    /// Files at `path` or below it
    fn entries_under(files: &BTreeMap<PathBuf, String>, path: &Path) -> Vec<PathBuf> {
        files
            .keys()
            .filter(|p| p.starts_with(path))
            .cloned()
            .collect()
    }

    fn apply_batch(files: &mut BTreeMap<PathBuf, String>, batch: &EditBatch) -> Result<(), FsError> {
        let mut moved = RenameMap::default();

        for (from, to) in batch.renames() {
            let from = moved.follow(from);
            if Self::stat_in(files, to).is_some() {
                return Err(FsError::AlreadyExists(to.to_path_buf()));
            }
            let entries = Self::entries_under(files, &from);
            if entries.is_empty() {
                return Err(FsError::NotFound(from));
            }
            for entry in entries {
                if let Some(content) = files.remove(&entry) {
                    let rest = entry.strip_prefix(&from).unwrap_or(Path::new(""));
                    let dest = if rest.as_os_str().is_empty() {
                        to.to_path_buf()
                    } else {
                        to.join(rest)
                    };
                    files.insert(dest, content);
                }
            }
            moved.record(&from, to);
        }

        for (path, edits) in batch.text_edits_by_file() {
            let path = moved.follow(&path);
            let content = files
                .get(&path)
                .ok_or_else(|| FsError::NotFound(path.clone()))?;
            let updated = apply_text_edits(content, &edits).map_err(|msg| FsError::Io {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, msg),
            })?;
            files.insert(path, updated);
        }

        Ok(())
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn find_matches(
        &self,
        root: &Path,
        pattern: &str,
        max_results: usize,
    ) -> Result<Vec<PathBuf>, FsError> {
        let compiled = compile(pattern)?;
        let files = self.files.lock();
        Ok(files
            .keys()
            .filter(|path| {
                path.strip_prefix(root)
                    .map(|rel| compiled.matches_with(&to_slash(rel), MATCH_OPTIONS))
                    .unwrap_or(false)
            })
            .take(max_results)
            .cloned()
            .collect())
    }

    async fn stat(&self, path: &Path) -> Result<Option<FileStat>, FsError> {
        Ok(Self::stat_in(&self.files.lock(), path))
    }

    async fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
        self.contents(path)
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    async fn delete(&self, path: &Path) -> Result<(), FsError> {
        let mut files = self.files.lock();
        let entries = Self::entries_under(&files, path);
        if entries.is_empty() {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        let mut deleted = self.deleted.lock();
        for entry in entries {
            if let Some(content) = files.remove(&entry) {
                deleted.push((entry, content));
            }
        }
        Ok(())
    }

    async fn copy(&self, source: &Path, target: &Path) -> Result<(), FsError> {
        let mut files = self.files.lock();
        if Self::stat_in(&files, target).is_some() {
            return Err(FsError::AlreadyExists(target.to_path_buf()));
        }
        let entries = Self::entries_under(&files, source);
        if entries.is_empty() {
            return Err(FsError::NotFound(source.to_path_buf()));
        }
        for entry in entries {
            let rest = entry.strip_prefix(source).unwrap_or(Path::new(""));
            let dest = if rest.as_os_str().is_empty() {
                target.to_path_buf()
            } else {
                target.join(rest)
            };
            let content = files.get(&entry).cloned().unwrap_or_default();
            files.insert(dest, content);
        }
        Ok(())
    }

    async fn commit_edit_batch(&self, batch: &EditBatch) -> Result<bool, FsError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(FsError::ReadOnly);
        }
        let mut files = self.files.lock();
        let mut staged = files.clone();
        match Self::apply_batch(&mut staged, batch) {
            Ok(()) => {
                *files = staged;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "In-memory edit batch rejected");
                Ok(false)
            }
        }
    }
}
