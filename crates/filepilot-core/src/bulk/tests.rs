//! End-to-end engine tests against the in-memory file system

use super::*;
use crate::config::BulkOpsConfig;
use crate::error::{ErrorKind, FsError};
use crate::fs::{EditBatch, FileStat, FileSystem, MemoryFileSystem};
use crate::references::{ImportReferenceResolver, ReferenceResolver};
use crate::workspace::WorkspaceContext;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn ctx() -> WorkspaceContext {
    WorkspaceContext::new("/w")
}

fn orchestrator(fs: Arc<dyn FileSystem>) -> BulkOperationOrchestrator {
    BulkOperationOrchestrator::new(fs)
}

/// Wraps a file system and reverses every search result
struct UnsortedFs(MemoryFileSystem);

#[async_trait]
impl FileSystem for UnsortedFs {
    async fn find_matches(
        &self,
        root: &Path,
        pattern: &str,
        max_results: usize,
    ) -> Result<Vec<PathBuf>, FsError> {
        let mut found = self.0.find_matches(root, pattern, max_results).await?;
        found.reverse();
        Ok(found)
    }
    async fn stat(&self, path: &Path) -> Result<Option<FileStat>, FsError> {
        self.0.stat(path).await
    }
    async fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
        self.0.read_to_string(path).await
    }
    async fn delete(&self, path: &Path) -> Result<(), FsError> {
        self.0.delete(path).await
    }
    async fn copy(&self, source: &Path, target: &Path) -> Result<(), FsError> {
        self.0.copy(source, target).await
    }
    async fn commit_edit_batch(&self, batch: &EditBatch) -> Result<bool, FsError> {
        self.0.commit_edit_batch(batch).await
    }
}

/// Wraps a file system and removes `victim` right before the first delete
struct RacingFs {
    inner: MemoryFileSystem,
    victim: PathBuf,
    deletes: AtomicUsize,
}

#[async_trait]
impl FileSystem for RacingFs {
    async fn find_matches(
        &self,
        root: &Path,
        pattern: &str,
        max_results: usize,
    ) -> Result<Vec<PathBuf>, FsError> {
        self.inner.find_matches(root, pattern, max_results).await
    }
    async fn stat(&self, path: &Path) -> Result<Option<FileStat>, FsError> {
        self.inner.stat(path).await
    }
    async fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
        self.inner.read_to_string(path).await
    }
    async fn delete(&self, path: &Path) -> Result<(), FsError> {
        if self.deletes.fetch_add(1, Ordering::SeqCst) == 0 {
            self.inner.remove(&self.victim);
        }
        self.inner.delete(path).await
    }
    async fn copy(&self, source: &Path, target: &Path) -> Result<(), FsError> {
        self.inner.copy(source, target).await
    }
    async fn commit_edit_batch(&self, batch: &EditBatch) -> Result<bool, FsError> {
        self.inner.commit_edit_batch(batch).await
    }
}

#[tokio::test]
async fn test_single_rename_without_importers() {
    let fs = Arc::new(MemoryFileSystem::with_files([("/w/old.ts", "export {};\n")]));
    let resolver: Arc<dyn ReferenceResolver> =
        Arc::new(ImportReferenceResolver::new(fs.clone(), "/w"));

    let result = orchestrator(fs.clone())
        .with_resolver(resolver)
        .run(&ctx(), &[Action::rename("old.ts", "new.ts")], None)
        .await
        .unwrap();

    assert_eq!(result.success_count, 1);
    assert_eq!(result.failed_count, 0);
    assert_eq!(result.total_references_updated, 0);
    assert_eq!(
        result.operations,
        vec![OperationRecord {
            kind: ActionKind::Rename,
            source: Some("old.ts".to_string()),
            target: Some("new.ts".to_string()),
            success: true,
            error: None,
        }]
    );
    assert_eq!(fs.paths(), vec![PathBuf::from("/w/new.ts")]);
}

#[tokio::test]
async fn test_rename_updates_two_importers() {
    let fs = Arc::new(MemoryFileSystem::with_files([
        ("/w/a.ts", "export const a = 1;\n"),
        ("/w/one.ts", "import { a } from './a';\n"),
        ("/w/nested/two.ts", "import { a } from '../a';\n"),
    ]));
    let resolver: Arc<dyn ReferenceResolver> =
        Arc::new(ImportReferenceResolver::new(fs.clone(), "/w"));

    let result = orchestrator(fs.clone())
        .with_resolver(resolver)
        .run(&ctx(), &[Action::rename("a.ts", "b.ts")], None)
        .await
        .unwrap();

    assert_eq!(result.total_references_updated, 2);
    assert_eq!(
        fs.contents(Path::new("/w/one.ts")).unwrap(),
        "import { a } from './b';\n"
    );
    assert_eq!(
        fs.contents(Path::new("/w/nested/two.ts")).unwrap(),
        "import { a } from '../b';\n"
    );
}

#[tokio::test]
async fn test_reference_updates_can_be_disabled() {
    let fs = Arc::new(MemoryFileSystem::with_files([
        ("/w/a.ts", ""),
        ("/w/one.ts", "import { a } from './a';\n"),
    ]));
    let resolver: Arc<dyn ReferenceResolver> =
        Arc::new(ImportReferenceResolver::new(fs.clone(), "/w"));
    let config = BulkOpsConfig {
        update_references: false,
        ..Default::default()
    };

    let result = orchestrator(fs.clone())
        .with_resolver(resolver)
        .with_config(config)
        .run(&ctx(), &[Action::rename("a.ts", "b.ts")], None)
        .await
        .unwrap();
    assert_eq!(result.total_references_updated, 0);
    assert_eq!(
        fs.contents(Path::new("/w/one.ts")).unwrap(),
        "import { a } from './a';\n"
    );
}

#[tokio::test]
async fn test_existing_target_aborts_whole_batch() {
    let fs = Arc::new(MemoryFileSystem::with_files([
        ("/w/a.ts", ""),
        ("/w/b.ts", ""),
        ("/w/c.ts", ""),
    ]));
    let before = fs.paths();

    let err = orchestrator(fs.clone())
        .run(
            &ctx(),
            &[Action::rename("a.ts", "x.ts"), Action::rename("b.ts", "c.ts")],
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(err.to_string().contains("c.ts"));
    assert_eq!(fs.paths(), before);
}

#[tokio::test]
async fn test_literal_batch_is_all_or_nothing() {
    let fs = Arc::new(MemoryFileSystem::with_files([
        ("/w/keep.txt", ""),
        ("/w/a.ts", ""),
    ]));
    let before = fs.paths();

    let err = orchestrator(fs.clone())
        .run(
            &ctx(),
            &[
                Action::delete("keep.txt"),
                Action::duplicate("a.ts", "copy.ts"),
                Action::move_to("missing.ts", "lib/missing.ts"),
            ],
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert_eq!(err.path(), Some("missing.ts"));
    assert_eq!(fs.paths(), before);
    assert!(fs.deleted().is_empty());
}

#[tokio::test]
async fn test_intra_batch_collision() {
    let fs = Arc::new(MemoryFileSystem::with_files([("/w/a.ts", ""), ("/w/b.ts", "")]));
    let err = orchestrator(fs.clone())
        .run(
            &ctx(),
            &[
                Action::duplicate("a.ts", "same.ts"),
                Action::rename("b.ts", "same.ts"),
            ],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(!fs.exists(Path::new("/w/same.ts")).await.unwrap());
}

#[tokio::test]
async fn test_delete_vanishing_mid_batch_is_recorded() {
    let fs = Arc::new(RacingFs {
        inner: MemoryFileSystem::with_files([("/w/1.txt", ""), ("/w/2.txt", ""), ("/w/3.txt", "")]),
        victim: PathBuf::from("/w/2.txt"),
        deletes: AtomicUsize::new(0),
    });

    let result = orchestrator(fs.clone())
        .run(
            &ctx(),
            &[
                Action::delete("1.txt"),
                Action::delete("2.txt"),
                Action::delete("3.txt"),
            ],
            None,
        )
        .await
        .unwrap();

    let outcomes: Vec<bool> = result.operations.iter().map(|op| op.success).collect();
    assert_eq!(outcomes, vec![true, false, true]);
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failed_count, 1);
    assert!(result.operations[1].error.is_some());
}

#[tokio::test]
async fn test_glob_delete_moves_matches_to_holding_list() {
    let fs = Arc::new(MemoryFileSystem::with_files([
        ("/w/a.log", ""),
        ("/w/b.log", ""),
        ("/w/keep.txt", ""),
    ]));
    let result = orchestrator(fs.clone())
        .run(&ctx(), &[Action::delete("*.log")], None)
        .await
        .unwrap();

    assert_eq!(result.success_count, 2);
    assert_eq!(
        fs.deleted(),
        vec![PathBuf::from("/w/a.log"), PathBuf::from("/w/b.log")]
    );
    assert_eq!(fs.paths(), vec![PathBuf::from("/w/keep.txt")]);
}

#[tokio::test]
async fn test_expansion_order_ignores_capability_order() {
    let fs = Arc::new(UnsortedFs(MemoryFileSystem::with_files([
        ("/w/src/b.js", ""),
        ("/w/src/a.js", ""),
        ("/w/src/nested/c.js", ""),
        ("/w/lib/d.js", ""),
    ])));

    let resolved = orchestrator(fs)
        .preview(&ctx(), &[Action::rename("**/*.js", "**/*.ts")])
        .await
        .unwrap();

    let sources: Vec<&str> = resolved
        .iter()
        .map(|a| a.source().relative.as_str())
        .collect();
    assert_eq!(
        sources,
        vec!["lib/d.js", "src/a.js", "src/b.js", "src/nested/c.js"]
    );
}

#[tokio::test]
async fn test_rejected_commit_after_deletes() {
    let fs = Arc::new(MemoryFileSystem::with_files([
        ("/w/junk.tmp", ""),
        ("/w/a.ts", ""),
    ]));
    fs.set_read_only(true);

    let err = orchestrator(fs.clone())
        .run(
            &ctx(),
            &[Action::delete("junk.tmp"), Action::rename("a.ts", "b.ts")],
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EditRejected);
    // the delete is not rolled back
    assert_eq!(fs.deleted(), vec![PathBuf::from("/w/junk.tmp")]);
    assert!(fs.exists(Path::new("/w/a.ts")).await.unwrap());
}

#[tokio::test]
async fn test_preview_does_not_mutate() {
    let fs = Arc::new(MemoryFileSystem::with_files([("/w/a.log", ""), ("/w/b.ts", "")]));
    let resolved = orchestrator(fs.clone())
        .preview(
            &ctx(),
            &[Action::delete("*.log"), Action::move_to("b.ts", "lib/b.ts")],
        )
        .await
        .unwrap();
    assert_eq!(resolved.len(), 2);
    assert_eq!(fs.paths().len(), 2);
    assert!(fs.deleted().is_empty());
}

#[tokio::test]
async fn test_progress_messages() {
    let fs = Arc::new(MemoryFileSystem::with_files([("/w/a.ts", "")]));
    let messages = Mutex::new(Vec::new());
    let on_progress = |message: &str| messages.lock().push(message.to_string());

    orchestrator(fs)
        .run(
            &ctx(),
            &[Action::duplicate("a.ts", "b.ts")],
            Some(&on_progress),
        )
        .await
        .unwrap();

    assert_eq!(
        messages.into_inner(),
        vec![
            "Expanding patterns...",
            "Validating 1 operation(s)...",
            "Collecting reference updates...",
            "Applying changes...",
            "Done: 1 succeeded, 0 failed",
        ]
    );
}

#[tokio::test]
async fn test_pre_mutation_errors() {
    let fs: Arc<dyn FileSystem> = Arc::new(MemoryFileSystem::with_files([("/w/a.ts", "")]));
    let cases: Vec<(WorkspaceContext, Vec<Action>, ErrorKind)> = vec![
        (
            ctx().with_trust(false),
            vec![Action::delete("a.ts")],
            ErrorKind::Untrusted,
        ),
        (
            WorkspaceContext::without_root(),
            vec![Action::delete("a.ts")],
            ErrorKind::NoWorkspace,
        ),
        (ctx(), vec![], ErrorKind::InvalidInput),
        (ctx(), vec![Action::delete("")], ErrorKind::InvalidInput),
        (ctx(), vec![Action::delete("*.none")], ErrorKind::FileNotFound),
        (ctx(), vec![Action::delete("[bad*")], ErrorKind::InvalidInput),
    ];

    for (ctx, actions, expected) in cases {
        let err = perform_bulk_operations(
            &ctx,
            fs.clone(),
            None,
            BulkOpsConfig::default(),
            &actions,
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), expected, "{:?}", actions);
    }
}
