//! Workspace context passed into every bulk operation

use crate::error::{BulkOpError, BulkOpResult};
use std::path::{Component, Path, PathBuf};

/// Explicit description of the workspace a batch runs against.
///
/// Carries the root folder and the trust flag so that a batch depends only on
/// its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContext {
    /// Absolute root folder, if a workspace is open
    pub root: Option<PathBuf>,
    /// Whether the user trusts this workspace with file edits
    pub trusted: bool,
}

impl WorkspaceContext {
    /// A trusted workspace rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            trusted: true,
        }
    }

    /// A context with no open folder
    pub fn without_root() -> Self {
        Self {
            root: None,
            trusted: true,
        }
    }

    /// Set the trust flag
    pub fn with_trust(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    /// Check trust and root, in that order, and return the root
    pub fn require_root(&self) -> BulkOpResult<&Path> {
        if !self.trusted {
            return Err(BulkOpError::untrusted());
        }
        self.root.as_deref().ok_or_else(BulkOpError::no_workspace)
    }

    /// Express an absolute path relative to the root, with `/` separators
    pub fn relative(&self, path: &Path) -> String {
        let rel = match self.root.as_deref() {
            Some(root) => path.strip_prefix(root).unwrap_or(path),
            None => path,
        };
        to_slash(rel)
    }
}

/// Render a path with `/` separators regardless of platform
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::RootDir | Component::Prefix(_) | Component::CurDir => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexically normalize a path, folding `.` and `..` without touching disk
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether `path` stays inside `root` after lexical normalization
pub fn is_within(root: &Path, path: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}
