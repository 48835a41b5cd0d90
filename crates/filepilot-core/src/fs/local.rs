//! File system backed by the local disk

use super::edit::{EditBatch, RenameMap, apply_text_edits};
use super::pattern::{DEFAULT_IGNORE_PATTERNS, IgnoreSet, MATCH_OPTIONS};
use super::{FileStat, FileSystem};
use crate::config::BulkOpsConfig;
use crate::error::FsError;
use crate::workspace::to_slash;
use async_trait::async_trait;
use chrono::Utc;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Name of the marker file recording where a deleted entry came from
const ORIGIN_FILE: &str = ".origin";

/// [`FileSystem`] implementation over `tokio::fs`.
///
/// Deletes are recoverable: the entry is moved into a timestamped folder
/// under the holding area together with an `.origin` file naming its original
/// location, and [`LocalFileSystem::restore`] puts it back.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    holding_area: PathBuf,
    ignore: IgnoreSet,
    read_only: bool,
}

impl LocalFileSystem {
    /// Create a file system for the workspace at `root` using default settings
    pub fn new(root: impl AsRef<Path>) -> Result<Self, FsError> {
        Self::with_config(root, &BulkOpsConfig::default())
    }

    /// Create a file system for the workspace at `root`
    pub fn with_config(root: impl AsRef<Path>, config: &BulkOpsConfig) -> Result<Self, FsError> {
        let root = root.as_ref();
        let holding_area = if config.holding_area.is_absolute() {
            config.holding_area.clone()
        } else {
            root.join(&config.holding_area)
        };

        let mut ignore = if config.ignore_patterns.is_empty() {
            IgnoreSet::new(DEFAULT_IGNORE_PATTERNS)?
        } else {
            IgnoreSet::new(&config.ignore_patterns)?
        };
        if let Ok(rel) = holding_area.strip_prefix(root) {
            let rel = to_slash(rel);
            if !rel.is_empty() {
                ignore.push(&format!("{}/**", glob::Pattern::escape(&rel)))?;
            }
        }

        Ok(Self {
            holding_area,
            ignore,
            read_only: false,
        })
    }

    /// Refuse every edit batch, as a read-only host would
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Folder that receives deleted entries
    pub fn holding_area(&self) -> &Path {
        &self.holding_area
    }

    /// Move a deleted entry back to where it came from.
    ///
    /// `entry` is the timestamped folder created by [`FileSystem::delete`].
    /// Returns the restored path.
    pub async fn restore(&self, entry: &Path) -> Result<PathBuf, FsError> {
        let origin_file = entry.join(ORIGIN_FILE);
        let origin = fs::read_to_string(&origin_file)
            .await
            .map_err(|e| FsError::io(&origin_file, e))?;
        let original = PathBuf::from(origin.trim_end());
        let name = original
            .file_name()
            .ok_or_else(|| FsError::NotFound(original.clone()))?;

        if fs::try_exists(&original).await.unwrap_or(false) {
            return Err(FsError::AlreadyExists(original));
        }
        if let Some(parent) = original.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FsError::io(parent, e))?;
        }
        let held = entry.join(name);
        fs::rename(&held, &original)
            .await
            .map_err(|e| FsError::io(&held, e))?;
        if let Err(e) = fs::remove_dir_all(entry).await {
            warn!(entry = %entry.display(), error = %e, "Failed to remove restored holding entry");
        }
        Ok(original)
    }

    /// Record the origin of `path` in `entry`, then move `path` into it
    async fn move_into_entry(path: &Path, name: &OsStr, entry: &Path) -> Result<(), FsError> {
        let mut origin = fs::File::create(entry.join(ORIGIN_FILE))
            .await
            .map_err(|e| FsError::io(entry, e))?;
        origin
            .write_all(path.to_string_lossy().as_bytes())
            .await
            .map_err(|e| FsError::io(entry, e))?;
        origin.flush().await.map_err(|e| FsError::io(entry, e))?;

        fs::rename(path, entry.join(name))
            .await
            .map_err(|e| FsError::io(path, e))
    }

    fn find_blocking(
        root: &Path,
        pattern: &str,
        max_results: usize,
        ignore: &IgnoreSet,
    ) -> Result<Vec<PathBuf>, FsError> {
        let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
        let full_pattern = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);

        let entries =
            glob::glob_with(&full_pattern, MATCH_OPTIONS).map_err(|e| FsError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.msg.to_string(),
            })?;

        let mut matches = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    let relative = path.strip_prefix(root).map(to_slash).unwrap_or_default();
                    if ignore.is_ignored(&relative) {
                        continue;
                    }
                    matches.push(path);
                }
                Err(e) => {
                    warn!("Error reading glob entry: {}", e);
                }
            }
        }

        matches.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        matches.truncate(max_results);
        Ok(matches)
    }

    async fn apply_batch(&self, batch: &EditBatch, journal: &mut CommitJournal) -> Result<(), FsError> {
        let mut moved = RenameMap::default();

        for (from, to) in batch.renames() {
            let from = moved.follow(from);
            if fs::try_exists(to).await.map_err(|e| FsError::io(to, e))? {
                return Err(FsError::AlreadyExists(to.to_path_buf()));
            }
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| FsError::io(parent, e))?;
            }
            fs::rename(&from, to)
                .await
                .map_err(|e| FsError::io(&from, e))?;
            debug!(from = %from.display(), to = %to.display(), "Renamed");
            journal.renames.push((from.clone(), to.to_path_buf()));
            moved.record(&from, to);
        }

        for (path, edits) in batch.text_edits_by_file() {
            let path = moved.follow(&path);
            let original = fs::read_to_string(&path)
                .await
                .map_err(|e| FsError::io(&path, e))?;
            let updated = apply_text_edits(&original, &edits).map_err(|msg| FsError::Io {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, msg),
            })?;
            journal.snapshots.push((path.clone(), original));
            fs::write(&path, updated)
                .await
                .map_err(|e| FsError::io(&path, e))?;
            debug!(path = %path.display(), edits = edits.len(), "Applied text edits");
        }

        Ok(())
    }
}

/// Undo information for a partially applied batch
#[derive(Debug, Default)]
struct CommitJournal {
    renames: Vec<(PathBuf, PathBuf)>,
    snapshots: Vec<(PathBuf, String)>,
}

impl CommitJournal {
    async fn rollback(self) {
        for (path, content) in self.snapshots.into_iter().rev() {
            if let Err(e) = fs::write(&path, content).await {
                warn!(path = %path.display(), error = %e, "Failed to restore file during rollback");
            }
        }
        for (from, to) in self.renames.into_iter().rev() {
            if let Err(e) = fs::rename(&to, &from).await {
                warn!(from = %to.display(), to = %from.display(), error = %e, "Failed to undo rename during rollback");
            }
        }
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn find_matches(
        &self,
        root: &Path,
        pattern: &str,
        max_results: usize,
    ) -> Result<Vec<PathBuf>, FsError> {
        let root_owned = root.to_path_buf();
        let pattern_owned = pattern.to_string();
        let ignore = self.ignore.clone();
        tokio::task::spawn_blocking(move || {
            Self::find_blocking(&root_owned, &pattern_owned, max_results, &ignore)
        })
        .await
        .map_err(|e| FsError::io(root, io::Error::other(e)))?
    }

    async fn stat(&self, path: &Path) -> Result<Option<FileStat>, FsError> {
        match fs::symlink_metadata(path).await {
            Ok(meta) => Ok(Some(FileStat {
                is_directory: meta.is_dir(),
                len: if meta.is_dir() { 0 } else { meta.len() },
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FsError::io(path, e)),
        }
    }

    async fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| FsError::io(path, e))
    }

    async fn delete(&self, path: &Path) -> Result<(), FsError> {
        if self.stat(path).await?.is_none() {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
        let short_id = &uuid::Uuid::new_v4().simple().to_string()[..8];
        let entry = self.holding_area.join(format!("{}-{}", stamp, short_id));
        fs::create_dir_all(&entry)
            .await
            .map_err(|e| FsError::io(&entry, e))?;

        if let Err(e) = Self::move_into_entry(path, name, &entry).await {
            discard(&entry).await;
            return Err(e);
        }
        debug!(path = %path.display(), holding = %entry.display(), "Moved to holding area");
        Ok(())
    }

    async fn copy(&self, source: &Path, target: &Path) -> Result<(), FsError> {
        let stat = self
            .stat(source)
            .await?
            .ok_or_else(|| FsError::NotFound(source.to_path_buf()))?;
        if self.stat(target).await?.is_some() {
            return Err(FsError::AlreadyExists(target.to_path_buf()));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FsError::io(parent, e))?;
        }

        if !stat.is_directory {
            let mut reader = fs::File::open(source)
                .await
                .map_err(|e| FsError::io(source, e))?;
            let mut writer = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(target)
                .await
                .map_err(|e| FsError::io(target, e))?;
            // the target is ours from here on; drop it if the copy fails
            let copied = async {
                tokio::io::copy(&mut reader, &mut writer).await?;
                writer.flush().await
            }
            .await;
            if let Err(e) = copied {
                drop(writer);
                discard(target).await;
                return Err(FsError::io(target, e));
            }
            return Ok(());
        }

        let source_owned = source.to_path_buf();
        let target_owned = target.to_path_buf();
        tokio::task::spawn_blocking(move || copy_dir_blocking(&source_owned, &target_owned))
            .await
            .map_err(|e| FsError::io(target, io::Error::other(e)))?
    }

    async fn commit_edit_batch(&self, batch: &EditBatch) -> Result<bool, FsError> {
        if self.read_only {
            warn!(operations = batch.len(), "Rejecting edit batch: file system is read-only");
            return Err(FsError::ReadOnly);
        }

        let mut journal = CommitJournal::default();
        match self.apply_batch(batch, &mut journal).await {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(error = %e, "Edit batch failed, rolling back");
                journal.rollback().await;
                Ok(false)
            }
        }
    }
}

/// Remove a partially created file or folder, logging what cannot be removed
async fn discard(path: &Path) {
    let removed = match fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    };
    if let Err(e) = removed {
        warn!(path = %path.display(), error = %e, "Failed to clean up after a failed operation");
    }
}

/// Copy the tree at `source` into the new folder `target`.
///
/// The source listing is taken before `target` is created, so a target
/// inside the source never copies itself. On failure `target` is removed.
fn copy_dir_blocking(source: &Path, target: &Path) -> Result<(), FsError> {
    let entries = WalkDir::new(source)
        .min_depth(1)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            FsError::io(&path, io::Error::other(e))
        })?;

    std::fs::create_dir(target).map_err(|e| FsError::io(target, e))?;
    let copied = entries.iter().try_for_each(|entry| {
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| FsError::io(entry.path(), io::Error::other(e)))?;
        let dest = target.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest).map_err(|e| FsError::io(&dest, e))
        } else {
            std::fs::copy(entry.path(), &dest)
                .map(|_| ())
                .map_err(|e| FsError::io(&dest, e))
        }
    });

    if copied.is_err() {
        if let Err(e) = std::fs::remove_dir_all(target) {
            warn!(path = %target.display(), error = %e, "Failed to remove partial copy");
        }
    }
    copied
}
