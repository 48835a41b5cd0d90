//! Workspace file search by glob pattern

use crate::base::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use async_trait::async_trait;
use filepilot_core::{BulkOpError, FileSystem, WorkspaceContext};
use std::sync::Arc;
use tracing::instrument;

/// Maximum number of files returned unless the caller asks for fewer
pub const MAX_FILES: usize = 1000;

/// Lists workspace files matching a glob pattern
pub struct FindFilesTool {
    ctx: WorkspaceContext,
    fs: Arc<dyn FileSystem>,
    max_results: usize,
}

impl FindFilesTool {
    pub fn new(ctx: WorkspaceContext, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            ctx,
            fs,
            max_results: MAX_FILES,
        }
    }

    /// Cap the number of results
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }
}

#[async_trait]
impl Tool for FindFilesTool {
    fn name(&self) -> &str {
        "find_files"
    }

    fn description(&self) -> &str {
        "Find files in the workspace by glob pattern.

- * matches any sequence of characters except /
- ** matches any number of folders
- ? matches any single character

Examples: \"**/*.ts\", \"src/**/*.test.js\", \"*.log\".
Results are sorted by path, relative to the workspace root. Dependency and
VCS folders (node_modules, .git, target) are skipped."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("pattern", "Glob pattern relative to the workspace root"),
                ToolParameter::number("max_results", "Maximum number of files to return")
                    .optional()
                    .with_default(MAX_FILES),
            ],
        )
    }

    fn is_read_only(&self) -> bool {
        true
    }

    #[instrument(skip(self, call), fields(call_id = %call.id))]
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let pattern: String = call.require("pattern")?;
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(BulkOpError::invalid_input("The search pattern must not be empty.").into());
        }
        let limit = call
            .get_number("max_results")
            .filter(|n| *n >= 1.0)
            .map(|n| (n as usize).min(self.max_results))
            .unwrap_or(self.max_results);

        let root = self.ctx.require_root()?;
        let matches = self
            .fs
            .find_matches(root, pattern, limit)
            .await
            .map_err(BulkOpError::from)?;

        let files: Vec<String> = matches.iter().map(|p| self.ctx.relative(p)).collect();
        let truncated = files.len() >= limit;

        let output = if files.is_empty() {
            format!("No files found matching pattern: {}", pattern)
        } else {
            let mut output = format!(
                "Found {} file{} matching pattern '{}'{}:\n\n",
                files.len(),
                if files.len() == 1 { "" } else { "s" },
                pattern,
                if truncated {
                    format!(" (limited to first {})", limit)
                } else {
                    String::new()
                }
            );
            for (i, file) in files.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, file));
            }
            output
        };

        Ok(ToolResult::success(&call.id, self.name(), output)
            .with_metadata("pattern", pattern)
            .with_metadata("results_count", files.len())
            .with_metadata("truncated", truncated)
            .with_metadata("files", files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filepilot_core::{MemoryFileSystem, UnifiedError};
    use serde_json::json;

    fn tool() -> FindFilesTool {
        let fs = Arc::new(MemoryFileSystem::with_files([
            ("/w/a.ts", ""),
            ("/w/src/b.ts", ""),
            ("/w/src/c.js", ""),
        ]));
        FindFilesTool::new(WorkspaceContext::new("/w"), fs)
    }

    #[tokio::test]
    async fn test_find_relative_sorted() {
        let call = ToolCall::from_json("1", "find_files", json!({"pattern": "**/*.ts"}));
        let result = tool().execute(&call).await.unwrap();
        assert_eq!(result.metadata["files"], json!(["a.ts", "src/b.ts"]));
        assert_eq!(result.metadata["truncated"], json!(false));
        assert!(result.output.unwrap().contains("1. a.ts"));
    }

    #[tokio::test]
    async fn test_max_results() {
        let call = ToolCall::from_json(
            "2",
            "find_files",
            json!({"pattern": "**/*", "max_results": 2}),
        );
        let result = tool().execute(&call).await.unwrap();
        assert_eq!(result.metadata["results_count"], json!(2));
        assert_eq!(result.metadata["truncated"], json!(true));
    }

    #[tokio::test]
    async fn test_empty_pattern_is_invalid_input() {
        let call = ToolCall::from_json("3", "find_files", json!({"pattern": "  "}));
        let err = tool().execute(&call).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_untrusted_workspace() {
        let fs = Arc::new(MemoryFileSystem::new());
        let tool = FindFilesTool::new(WorkspaceContext::new("/w").with_trust(false), fs);
        let call = ToolCall::from_json("4", "find_files", json!({"pattern": "*"}));
        let err = tool.execute(&call).await.unwrap_err();
        assert_eq!(err.error_code(), "UNTRUSTED");
        assert!(tool.is_read_only());
        assert_eq!(tool.concurrency_mode(), crate::base::ConcurrencyMode::Parallel);
    }
}
