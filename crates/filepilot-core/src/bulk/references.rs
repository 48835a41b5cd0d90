//! Concurrent reference collection for renames and moves

use super::action::ResolvedAction;
use crate::fs::ReferenceEdit;
use crate::references::{ReferenceResolver, RenameRequest};
use futures::future::join_all;
use tracing::{debug, warn};

/// Gathers reference edits for every rename/move in a batch
pub(crate) struct ReferenceCollector<'a> {
    resolver: Option<&'a dyn ReferenceResolver>,
}

impl<'a> ReferenceCollector<'a> {
    /// `None` disables reference updates altogether
    pub(crate) fn new(resolver: Option<&'a dyn ReferenceResolver>) -> Self {
        Self { resolver }
    }

    /// One entry per action, aligned by index. Deletes, duplicates and
    /// unsupported files get `None`.
    pub(crate) async fn collect(&self, actions: &[ResolvedAction]) -> Vec<Option<ReferenceEdit>> {
        let requests = actions.iter().map(|action| self.collect_one(action));
        let edits = join_all(requests).await;

        debug!(
            actions = actions.len(),
            with_edits = edits.iter().filter(|e| e.is_some()).count(),
            "Collected reference edits"
        );
        edits
    }

    async fn collect_one(&self, action: &ResolvedAction) -> Option<ReferenceEdit> {
        let resolver = self.resolver?;
        if !action.kind().is_rename() {
            return None;
        }
        let source = action.source();
        let target = action.target()?;
        if !resolver.supports(&source.absolute) {
            return None;
        }

        let request = RenameRequest::new(&source.absolute, &target.absolute);
        match resolver.resolve_rename_references(&request).await {
            Ok(Some(edit)) if !edit.is_empty() => Some(edit),
            Ok(_) => None,
            Err(e) => {
                warn!(
                    source = %source.relative,
                    error = %e,
                    "Reference lookup failed; renaming without reference updates"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::action::{ActionKind, ResolvedPath};
    use crate::error::FsError;
    use crate::fs::{Position, Range, TextEdit};
    use async_trait::async_trait;
    use mockall::mock;
    use std::path::{Path, PathBuf};

    mock! {
        Resolver {}

        #[async_trait]
        impl ReferenceResolver for Resolver {
            fn supports(&self, path: &Path) -> bool;
            async fn resolve_rename_references(
                &self,
                request: &RenameRequest,
            ) -> Result<Option<ReferenceEdit>, FsError>;
        }
    }

    fn path(rel: &str) -> ResolvedPath {
        ResolvedPath {
            relative: rel.to_string(),
            absolute: PathBuf::from("/w").join(rel),
        }
    }

    fn one_edit(file: &str) -> ReferenceEdit {
        let mut edit = ReferenceEdit::new();
        edit.push(
            file,
            TextEdit::new(Range::new(Position::new(0, 0), Position::new(0, 1)), "x"),
        );
        edit
    }

    #[tokio::test]
    async fn test_results_align_with_actions() {
        let mut resolver = MockResolver::new();
        resolver.expect_supports().returning(|_| true);
        resolver
            .expect_resolve_rename_references()
            .times(2)
            .returning(|req| {
                if req.old_path.ends_with("a.ts") {
                    Ok(Some(one_edit("/w/main.ts")))
                } else {
                    Ok(None)
                }
            });

        let actions = vec![
            ResolvedAction::Delete { source: path("x.log") },
            ResolvedAction::transfer(ActionKind::Rename, path("a.ts"), path("b.ts")),
            ResolvedAction::transfer(ActionKind::Duplicate, path("c.ts"), path("d.ts")),
            ResolvedAction::transfer(ActionKind::Move, path("e.ts"), path("lib/e.ts")),
        ];
        let edits = ReferenceCollector::new(Some(&resolver))
            .collect(&actions)
            .await;

        assert_eq!(edits.len(), 4);
        assert!(edits[0].is_none());
        assert_eq!(edits[1].as_ref().map(|e| e.edit_count()), Some(1));
        assert!(edits[2].is_none());
        assert!(edits[3].is_none());
    }

    #[tokio::test]
    async fn test_request_carries_identifier_and_new_path() {
        let mut resolver = MockResolver::new();
        resolver.expect_supports().returning(|_| true);
        resolver
            .expect_resolve_rename_references()
            .withf(|req| {
                req.new_identifier == "b"
                    && req.new_path == Path::new("/w/lib/b.ts")
                    && req.anchor == Position::new(0, 0)
            })
            .times(1)
            .returning(|_| Ok(None));

        let actions = vec![ResolvedAction::transfer(
            ActionKind::Move,
            path("a.ts"),
            path("lib/b.ts"),
        )];
        ReferenceCollector::new(Some(&resolver))
            .collect(&actions)
            .await;
    }

    #[tokio::test]
    async fn test_unsupported_and_failing_resolvers_degrade_to_none() {
        let mut resolver = MockResolver::new();
        resolver
            .expect_supports()
            .returning(|p| p.extension().is_some_and(|e| e == "ts"));
        resolver
            .expect_resolve_rename_references()
            .times(1)
            .returning(|_| Err(FsError::ReadOnly));

        let actions = vec![
            ResolvedAction::transfer(ActionKind::Rename, path("a.md"), path("b.md")),
            ResolvedAction::transfer(ActionKind::Rename, path("a.ts"), path("b.ts")),
        ];
        let edits = ReferenceCollector::new(Some(&resolver))
            .collect(&actions)
            .await;
        assert_eq!(edits, vec![None, None]);
    }

    #[tokio::test]
    async fn test_without_resolver() {
        let actions = vec![ResolvedAction::transfer(
            ActionKind::Rename,
            path("a.ts"),
            path("b.ts"),
        )];
        let edits = ReferenceCollector::new(None).collect(&actions).await;
        assert_eq!(edits, vec![None]);
    }
}
