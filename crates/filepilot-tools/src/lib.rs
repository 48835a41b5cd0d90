//! Agent tools for Filepilot
//!
//! Exposes the bulk-operation engine of `filepilot-core` to an assistant as
//! two tools: `bulk_file_operations` and `find_files`.

pub mod base;
pub mod tools;

pub use base::{Tool, ToolCall, ToolError, ToolResult, ToolSchema};
pub use tools::{BulkFileOperationsTool, FindFilesTool};

use filepilot_core::{BulkOpsConfig, FileSystem, ReferenceResolver, WorkspaceContext};
use std::sync::Arc;

/// Get all default tools for one workspace
pub fn get_default_tools(
    ctx: WorkspaceContext,
    fs: Arc<dyn FileSystem>,
    resolver: Option<Arc<dyn ReferenceResolver>>,
    config: BulkOpsConfig,
) -> Vec<Arc<dyn Tool>> {
    let max_results = config.max_results;
    vec![
        Arc::new(BulkFileOperationsTool::new(
            ctx.clone(),
            fs.clone(),
            resolver,
            config,
        )),
        Arc::new(FindFilesTool::new(ctx, fs).with_max_results(max_results)),
    ]
}
