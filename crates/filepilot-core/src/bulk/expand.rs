//! Pattern expansion: declarative actions to literal resolved actions

use super::action::{ActionKind, ActionShape, ResolvedAction, ResolvedPath};
use super::transform::transform;
use crate::error::{BulkOpError, BulkOpResult};
use crate::fs::FileSystem;
use crate::fs::pattern::has_wildcard;
use crate::workspace::to_slash;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expands glob-bearing actions against a file system
pub(crate) struct PatternExpander<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
    max_results: usize,
}

impl<'a> PatternExpander<'a> {
    pub(crate) fn new(fs: &'a dyn FileSystem, root: &'a Path, max_results: usize) -> Self {
        Self {
            fs,
            root,
            max_results,
        }
    }

    /// Expand every action in order. Fails with `FILE_NOT_FOUND` when nothing
    /// at all is left to operate on.
    pub(crate) async fn expand(&self, shapes: &[ActionShape<'_>]) -> BulkOpResult<Vec<ResolvedAction>> {
        let mut resolved = Vec::new();
        for shape in shapes {
            match *shape {
                ActionShape::Delete { path } => {
                    if has_wildcard(path) {
                        for matched in self.matches(path).await? {
                            resolved.push(ResolvedAction::Delete { source: matched });
                        }
                    } else {
                        resolved.push(ResolvedAction::Delete {
                            source: self.literal(path),
                        });
                    }
                }
                ActionShape::Transfer {
                    kind,
                    source,
                    target,
                } => {
                    if has_wildcard(source) {
                        for matched in self.matches(source).await? {
                            let target = self.literal(&transform(&matched.relative, source, target));
                            resolved.push(ResolvedAction::transfer(kind, matched, target));
                        }
                    } else {
                        resolved.push(ResolvedAction::transfer(
                            kind,
                            self.literal(source),
                            self.literal(target),
                        ));
                    }
                }
            }
        }

        if resolved.is_empty() {
            return Err(BulkOpError::no_matches());
        }
        debug!(
            actions = shapes.len(),
            resolved = resolved.len(),
            deletes = resolved
                .iter()
                .filter(|a| a.kind() == ActionKind::Delete)
                .count(),
            "Expanded actions"
        );
        Ok(resolved)
    }

    /// Matches for one pattern, sorted and de-duplicated
    async fn matches(&self, pattern: &str) -> BulkOpResult<Vec<ResolvedPath>> {
        let mut found: Vec<PathBuf> = self
            .fs
            .find_matches(self.root, pattern, self.max_results)
            .await?;
        // byte order of the full path, not component order
        found.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        found.dedup();
        debug!(pattern, matches = found.len(), "Pattern matched");

        Ok(found
            .into_iter()
            .map(|absolute| ResolvedPath {
                relative: to_slash(absolute.strip_prefix(self.root).unwrap_or(&absolute)),
                absolute,
            })
            .collect())
    }

    fn literal(&self, relative: &str) -> ResolvedPath {
        ResolvedPath {
            relative: relative.to_string(),
            absolute: self.root.join(relative),
        }
    }
}
