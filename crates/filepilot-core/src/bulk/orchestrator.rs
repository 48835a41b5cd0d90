//! Phase sequencing for bulk operations

use super::action::{Action, ActionShape, ResolvedAction};
use super::expand::PatternExpander;
use super::references::ReferenceCollector;
use super::result::BatchResult;
use super::transaction::{TransactionApplier, TransactionBuilder};
use super::validate::BatchValidator;
use crate::config::BulkOpsConfig;
use crate::error::{BulkOpError, BulkOpResult};
use crate::fs::FileSystem;
use crate::references::ReferenceResolver;
use crate::workspace::WorkspaceContext;
use std::sync::Arc;
use tracing::{info, instrument};

/// Callback receiving human-readable progress messages
pub type ProgressFn = dyn Fn(&str) + Send + Sync;

/// Runs a batch through expand, validate, collect references, build and apply.
///
/// Holds no per-batch state; one orchestrator can serve any number of calls.
#[derive(Clone)]
pub struct BulkOperationOrchestrator {
    fs: Arc<dyn FileSystem>,
    resolver: Option<Arc<dyn ReferenceResolver>>,
    config: BulkOpsConfig,
}

impl BulkOperationOrchestrator {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            resolver: None,
            config: BulkOpsConfig::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ReferenceResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_config(mut self, config: BulkOpsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BulkOpsConfig {
        &self.config
    }

    /// Execute `actions` and return the aggregated result.
    ///
    /// Every error except `EDIT_REJECTED` is raised before anything on disk
    /// changed. `EDIT_REJECTED` comes after deletes and duplicates already ran.
    #[instrument(skip_all, fields(actions = actions.len()))]
    pub async fn run(
        &self,
        ctx: &WorkspaceContext,
        actions: &[Action],
        on_progress: Option<&(dyn Fn(&str) + Send + Sync + '_)>,
    ) -> BulkOpResult<BatchResult> {
        let progress = |message: &str| {
            if let Some(report) = on_progress {
                report(message);
            }
        };

        let resolved = self.prepare(ctx, actions, &progress).await?;

        progress("Collecting reference updates...");
        let resolver = if self.config.update_references {
            self.resolver.as_deref()
        } else {
            None
        };
        let references = ReferenceCollector::new(resolver).collect(&resolved).await;

        progress("Applying changes...");
        let mut builder = TransactionBuilder::new(self.fs.as_ref());
        for (action, edits) in resolved.iter().zip(references) {
            builder.add(action, edits).await;
        }
        let (batch, result) = builder.finish();
        TransactionApplier::new(self.fs.as_ref()).apply(&batch).await?;

        progress(&format!("Done: {}", result.summary()));
        info!(
            succeeded = result.success_count,
            failed = result.failed_count,
            references = result.total_references_updated,
            "Bulk operation finished"
        );
        Ok(result)
    }

    /// Expand and validate without changing anything
    #[instrument(skip_all, fields(actions = actions.len()))]
    pub async fn preview(
        &self,
        ctx: &WorkspaceContext,
        actions: &[Action],
    ) -> BulkOpResult<Vec<ResolvedAction>> {
        self.prepare(ctx, actions, &|_: &str| {}).await
    }

    async fn prepare(
        &self,
        ctx: &WorkspaceContext,
        actions: &[Action],
        progress: &(dyn Fn(&str) + Sync),
    ) -> BulkOpResult<Vec<ResolvedAction>> {
        let root = ctx.require_root()?;
        if actions.is_empty() {
            return Err(BulkOpError::invalid_input_with_context(
                "No operations were given.",
                "empty_batch",
            ));
        }
        let shapes = actions
            .iter()
            .enumerate()
            .map(|(i, action)| action.shape(i))
            .collect::<BulkOpResult<Vec<ActionShape<'_>>>>()?;

        progress("Expanding patterns...");
        let resolved = PatternExpander::new(self.fs.as_ref(), root, self.config.max_results)
            .expand(&shapes)
            .await?;

        progress(&format!("Validating {} operation(s)...", resolved.len()));
        BatchValidator::new(self.fs.as_ref())
            .validate(ctx, &resolved)
            .await?;

        Ok(resolved)
    }
}

/// Run a batch of actions against the workspace in `ctx`
pub async fn perform_bulk_operations(
    ctx: &WorkspaceContext,
    fs: Arc<dyn FileSystem>,
    resolver: Option<Arc<dyn ReferenceResolver>>,
    config: BulkOpsConfig,
    actions: &[Action],
    on_progress: Option<&(dyn Fn(&str) + Send + Sync + '_)>,
) -> BulkOpResult<BatchResult> {
    let mut orchestrator = BulkOperationOrchestrator::new(fs).with_config(config);
    if let Some(resolver) = resolver {
        orchestrator = orchestrator.with_resolver(resolver);
    }
    orchestrator.run(ctx, actions, on_progress).await
}
