//! Whole-batch precondition checks, run before any mutation

use super::action::ResolvedAction;
use crate::error::{BulkOpError, BulkOpResult};
use crate::fs::FileSystem;
use crate::workspace::{WorkspaceContext, is_within, normalize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// Checks every resolved action against the whole batch
pub(crate) struct BatchValidator<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> BatchValidator<'a> {
    pub(crate) fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Run every check on every action without side effects.
    ///
    /// The first violation in action order is returned; its message notes how
    /// many further problems were found.
    pub(crate) async fn validate(
        &self,
        ctx: &WorkspaceContext,
        actions: &[ResolvedAction],
    ) -> BulkOpResult<()> {
        let root = ctx.require_root()?;
        let mut problems: Vec<BulkOpError> = Vec::new();
        let mut targets: HashSet<PathBuf> = HashSet::new();

        for action in actions {
            let source = action.source();
            let target = action.target();

            let escaping = std::iter::once(source)
                .chain(target)
                .find(|p| !is_within(root, &p.absolute));
            if let Some(path) = escaping {
                problems.push(BulkOpError::invalid_input_with_context(
                    format!(
                        "Path '{}' resolves outside the workspace. No changes were made; the whole batch was aborted.",
                        path.relative
                    ),
                    "path_escape",
                ));
                continue;
            }

            if let Some(target) = target {
                let from = normalize(&source.absolute);
                let to = normalize(&target.absolute);
                if to != from && to.starts_with(&from) {
                    problems.push(BulkOpError::invalid_input_with_context(
                        format!(
                            "Cannot {} '{}' into itself ('{}'). No changes were made; the whole batch was aborted.",
                            action.kind(),
                            source.relative,
                            target.relative
                        ),
                        "target_inside_source",
                    ));
                    continue;
                }
            }

            if !self.fs.exists(&source.absolute).await? {
                problems.push(BulkOpError::file_not_found(&source.relative));
            }

            if let Some(target) = target {
                if self.fs.exists(&target.absolute).await? {
                    problems.push(BulkOpError::already_exists(&target.relative));
                } else if !targets.insert(normalize(&target.absolute)) {
                    problems.push(BulkOpError::target_collision(&target.relative));
                }
            }
        }

        debug!(
            actions = actions.len(),
            problems = problems.len(),
            "Validated batch"
        );

        let further = problems.len().saturating_sub(1);
        match problems.into_iter().next() {
            None => Ok(()),
            Some(first) if further == 0 => Err(first),
            Some(first) => Err(first.with_note(format!(
                "{} further problem(s) were found in the batch.",
                further
            ))),
        }
    }
}
