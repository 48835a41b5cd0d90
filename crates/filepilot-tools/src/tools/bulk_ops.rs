//! Bulk rename, move, duplicate and delete as an agent tool

use crate::base::{ConcurrencyMode, Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use async_trait::async_trait;
use filepilot_core::{
    Action, BatchResult, BulkOperationOrchestrator, BulkOpsConfig, FileSystem, ReferenceResolver,
    ResolvedAction, WorkspaceContext,
};
use serde_json::json;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Applies a batch of file operations as one transaction
pub struct BulkFileOperationsTool {
    ctx: WorkspaceContext,
    orchestrator: BulkOperationOrchestrator,
}

impl BulkFileOperationsTool {
    pub fn new(
        ctx: WorkspaceContext,
        fs: Arc<dyn FileSystem>,
        resolver: Option<Arc<dyn ReferenceResolver>>,
        config: BulkOpsConfig,
    ) -> Self {
        let mut orchestrator = BulkOperationOrchestrator::new(fs).with_config(config);
        if let Some(resolver) = resolver {
            orchestrator = orchestrator.with_resolver(resolver);
        }
        Self { ctx, orchestrator }
    }

    fn parse_actions(call: &ToolCall) -> Result<Vec<Action>, ToolError> {
        let actions: Vec<Action> = call.require("actions")?;
        if actions.is_empty() {
            return Err(ToolError::InvalidArguments(
                "'actions' must contain at least one operation".to_string(),
            ));
        }
        Ok(actions)
    }

    fn render_preview(resolved: &[ResolvedAction]) -> String {
        let mut output = format!("Dry run: {} operation(s) would be applied:\n\n", resolved.len());
        for (i, action) in resolved.iter().enumerate() {
            let _ = match action.target() {
                Some(target) => writeln!(
                    output,
                    "{}. {} {} -> {}",
                    i + 1,
                    action.kind(),
                    action.source().relative,
                    target.relative
                ),
                None => writeln!(output, "{}. {} {}", i + 1, action.kind(), action.source().relative),
            };
        }
        output
    }

    fn render_result(result: &BatchResult) -> String {
        let mut output = format!("Bulk operation finished: {}", result.summary());
        if result.total_references_updated > 0 {
            let _ = write!(
                output,
                ", {} reference(s) updated",
                result.total_references_updated
            );
        }
        output.push_str("\n\n");
        for op in &result.operations {
            let status = if op.success { "ok" } else { "failed" };
            let source = op.source.as_deref().unwrap_or_default();
            let _ = match (&op.target, &op.error) {
                (Some(target), None) => {
                    writeln!(output, "[{}] {} {} -> {}", status, op.kind, source, target)
                }
                (Some(target), Some(error)) => writeln!(
                    output,
                    "[{}] {} {} -> {}: {}",
                    status, op.kind, source, target, error
                ),
                (None, None) => writeln!(output, "[{}] {} {}", status, op.kind, source),
                (None, Some(error)) => {
                    writeln!(output, "[{}] {} {}: {}", status, op.kind, source, error)
                }
            };
        }
        output
    }
}

#[async_trait]
impl Tool for BulkFileOperationsTool {
    fn name(&self) -> &str {
        "bulk_file_operations"
    }

    fn description(&self) -> &str {
        "Rename, move, duplicate or delete files in the workspace as one transaction.

Each action is an object {\"type\": ..., \"params\": {...}}:
- rename / move / duplicate: params {\"source\", \"target\"}
- delete: params {\"path\"}

Paths are relative to the workspace root. `source` and `path` may be glob
patterns (e.g. \"**/*.js\"); a target like \"**/*.ts\" swaps the extension of
every match. Deleted files are moved to a recoverable holding area. Renames
and moves update import references in other files.

The whole batch is checked first: if any source is missing or any target
already exists, nothing is changed. Use dry_run to preview the expanded
operations."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::array(
                    "actions",
                    "Operations to apply, in order",
                    json!({
                        "type": "object",
                        "properties": {
                            "type": {"type": "string", "enum": ["rename", "move", "duplicate", "delete"]},
                            "params": {
                                "type": "object",
                                "properties": {
                                    "source": {"type": "string"},
                                    "target": {"type": "string"},
                                    "path": {"type": "string"}
                                }
                            }
                        },
                        "required": ["type", "params"]
                    }),
                ),
                ToolParameter::boolean("dry_run", "Only expand and validate, change nothing")
                    .optional()
                    .with_default(false),
            ],
        )
    }

    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        Self::parse_actions(call).map(|_| ())
    }

    fn concurrency_mode(&self) -> ConcurrencyMode {
        ConcurrencyMode::Sequential
    }

    #[instrument(skip(self, call), fields(call_id = %call.id))]
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let actions = Self::parse_actions(call)?;
        let dry_run = call.get_bool("dry_run").unwrap_or(false);

        if dry_run {
            let resolved = self.orchestrator.preview(&self.ctx, &actions).await?;
            return Ok(
                ToolResult::success(&call.id, self.name(), Self::render_preview(&resolved))
                    .with_metadata("dryRun", true)
                    .with_metadata("operations", serde_json::to_value(&resolved)?),
            );
        }

        let on_progress = |message: &str| debug!(progress = message);
        let result = self
            .orchestrator
            .run(&self.ctx, &actions, Some(&on_progress))
            .await?;

        Ok(
            ToolResult::success(&call.id, self.name(), Self::render_result(&result))
                .with_metadata("successCount", result.success_count)
                .with_metadata("failedCount", result.failed_count)
                .with_metadata("totalReferencesUpdated", result.total_references_updated)
                .with_metadata("operations", serde_json::to_value(&result.operations)?),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filepilot_core::{MemoryFileSystem, UnifiedError};
    use std::path::{Path, PathBuf};

    fn tool(fs: Arc<MemoryFileSystem>) -> BulkFileOperationsTool {
        BulkFileOperationsTool::new(
            WorkspaceContext::new("/w"),
            fs,
            None,
            BulkOpsConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_applies_actions_and_reports_counts() {
        let fs = Arc::new(MemoryFileSystem::with_files([("/w/a.ts", ""), ("/w/x.log", "")]));
        let call = ToolCall::from_json(
            "call-1",
            "bulk_file_operations",
            json!({"actions": [
                {"type": "rename", "params": {"source": "a.ts", "target": "b.ts"}},
                {"type": "delete", "params": {"path": "*.log"}}
            ]}),
        );

        let result = tool(fs.clone()).execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.metadata["successCount"], json!(2));
        assert_eq!(result.metadata["failedCount"], json!(0));
        assert_eq!(
            result.metadata["operations"][0],
            json!({"type": "rename", "source": "a.ts", "target": "b.ts", "success": true})
        );
        assert!(result.output.unwrap().starts_with("Bulk operation finished: 2 succeeded, 0 failed"));
        assert_eq!(fs.paths(), vec![PathBuf::from("/w/b.ts")]);
    }

    #[tokio::test]
    async fn test_dry_run_changes_nothing() {
        let fs = Arc::new(MemoryFileSystem::with_files([("/w/a.js", ""), ("/w/b.js", "")]));
        let call = ToolCall::from_json(
            "call-2",
            "bulk_file_operations",
            json!({
                "actions": [{"type": "rename", "params": {"source": "*.js", "target": "*.ts"}}],
                "dry_run": true
            }),
        );

        let result = tool(fs.clone()).execute(&call).await.unwrap();
        let output = result.output.unwrap();
        assert!(output.contains("1. rename a.js -> a.ts"));
        assert!(output.contains("2. rename b.js -> b.ts"));
        assert!(fs.contents(Path::new("/w/a.js")).is_some());
    }

    #[tokio::test]
    async fn test_refused_batch_surfaces_code() {
        let fs = Arc::new(MemoryFileSystem::with_files([("/w/a.ts", ""), ("/w/b.ts", "")]));
        let call = ToolCall::from_json(
            "call-3",
            "bulk_file_operations",
            json!({"actions": [{"type": "rename", "params": {"source": "a.ts", "target": "b.ts"}}]}),
        );

        let err = tool(fs.clone()).execute(&call).await.unwrap_err();
        assert_eq!(err.error_code(), "ALREADY_EXISTS");

        let result = tool(fs).execute_with_timing(&call).await;
        assert!(!result.success);
        assert_eq!(result.metadata["error_code"], json!("ALREADY_EXISTS"));
        assert!(result.error.unwrap().contains("b.ts"));
    }

    #[tokio::test]
    async fn test_malformed_actions_fail_validation() {
        let fs = Arc::new(MemoryFileSystem::new());
        let call = ToolCall::from_json(
            "call-4",
            "bulk_file_operations",
            json!({"actions": [{"type": "chmod", "params": {"path": "a"}}]}),
        );
        let tool = tool(fs);
        assert_eq!(tool.concurrency_mode(), ConcurrencyMode::Sequential);
        assert!(matches!(
            tool.validate(&call),
            Err(ToolError::InvalidArguments(_))
        ));

        let empty = ToolCall::from_json("call-5", "bulk_file_operations", json!({"actions": []}));
        let result = tool.execute_with_timing(&empty).await;
        assert_eq!(result.metadata["error_code"], json!("TOOL_INVALID_ARGS"));
    }
}
