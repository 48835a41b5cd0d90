//! Building and committing the edit batch

use super::action::ResolvedAction;
use super::result::BatchResult;
use crate::error::{BulkOpError, BulkOpResult};
use crate::fs::{EditBatch, FileSystem, ReferenceEdit};
use tracing::{debug, warn};

/// Folds resolved actions into one [`EditBatch`].
///
/// Deletes and duplicates run immediately; renames and moves are queued
/// together with their reference edits. Per-action failures are recorded and
/// never stop the remaining actions.
pub(crate) struct TransactionBuilder<'a> {
    fs: &'a dyn FileSystem,
    batch: EditBatch,
    result: BatchResult,
}

impl<'a> TransactionBuilder<'a> {
    pub(crate) fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            batch: EditBatch::new(),
            result: BatchResult::new(),
        }
    }

    pub(crate) async fn add(&mut self, action: &ResolvedAction, references: Option<ReferenceEdit>) {
        match action {
            ResolvedAction::Delete { source } => match self.fs.delete(&source.absolute).await {
                Ok(()) => self.result.record_success(action),
                Err(e) => {
                    warn!(path = %source.relative, error = %e, "Delete failed");
                    self.result.record_failure(action, e);
                }
            },
            ResolvedAction::Duplicate { source, target } => {
                match self.fs.copy(&source.absolute, &target.absolute).await {
                    Ok(()) => self.result.record_success(action),
                    Err(e) => {
                        warn!(source = %source.relative, target = %target.relative, error = %e, "Duplicate failed");
                        self.result.record_failure(action, e);
                    }
                }
            }
            ResolvedAction::Rename { source, target } | ResolvedAction::Move { source, target } => {
                self.batch.rename_file(&source.absolute, &target.absolute);
                if let Some(references) = references {
                    self.result.total_references_updated += self.batch.merge(&references);
                }
                self.result.record_success(action);
            }
        }
    }

    pub(crate) fn finish(self) -> (EditBatch, BatchResult) {
        (self.batch, self.result)
    }
}

/// Commits a built batch as one unit
pub(crate) struct TransactionApplier<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> TransactionApplier<'a> {
    pub(crate) fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// An empty batch is a no-op. A refused or failed commit is `EDIT_REJECTED`.
    pub(crate) async fn apply(&self, batch: &EditBatch) -> BulkOpResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        debug!(operations = batch.len(), "Committing edit batch");
        match self.fs.commit_edit_batch(batch).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("Edit batch was rejected");
                Err(BulkOpError::edit_rejected())
            }
            Err(e) => {
                warn!(error = %e, "Edit batch commit failed");
                Err(BulkOpError::edit_rejected())
            }
        }
    }
}
