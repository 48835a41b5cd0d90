//! Core Tool trait definition

use super::error::ToolError;
use super::types::{ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;
use filepilot_core::UnifiedError;
use std::time::Instant;

/// Concurrency mode for tool execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Tool can run in parallel with any other tool
    #[default]
    Parallel,

    /// Tool must run sequentially (one at a time globally)
    Sequential,
}

/// Base trait for all tools
///
/// Tools are capabilities that an assistant can use to act on the workspace.
/// Each tool has a schema for validation and execution logic.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's unique name (e.g., "find_files")
    fn name(&self) -> &str;

    /// Get the tool's description for LLM understanding
    fn description(&self) -> &str;

    /// Get the tool's JSON schema for input parameters
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments
    ///
    /// # Errors
    ///
    /// Returns `ToolError` if arguments are invalid or the operation is
    /// refused before touching any file.
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError>;

    /// Validate the tool call arguments
    ///
    /// Called before `execute()` to verify arguments are valid.
    /// Default implementation accepts all arguments.
    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        let _ = call;
        Ok(())
    }

    /// Get the concurrency mode (determines parallel execution)
    fn concurrency_mode(&self) -> ConcurrencyMode {
        ConcurrencyMode::Parallel
    }

    /// Whether this tool only reads data without side effects
    fn is_read_only(&self) -> bool {
        false
    }

    /// Execute the tool with timing and error handling
    ///
    /// Validates, executes, measures the duration and converts errors into a
    /// failed `ToolResult` carrying an `error_code` metadata entry. Always
    /// returns a `ToolResult`.
    async fn execute_with_timing(&self, call: &ToolCall) -> ToolResult {
        let start_time = Instant::now();

        let outcome = match self.validate(call) {
            Ok(()) => self.execute(call).await,
            Err(err) => Err(err),
        };

        let elapsed = start_time.elapsed().as_millis() as u64;
        match outcome {
            Ok(mut result) => {
                result.call_id = call.id.clone();
                result.with_execution_time(elapsed)
            }
            Err(err) => ToolResult::error(&call.id, self.name(), err.to_string())
                .with_metadata("error_code", err.error_code())
                .with_execution_time(elapsed),
        }
    }
}
