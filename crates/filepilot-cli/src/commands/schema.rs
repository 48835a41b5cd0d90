//! Schema command implementation

use anyhow::Context;
use filepilot_core::{
    BulkOpsConfig, ImportReferenceResolver, LocalFileSystem, ReferenceResolver, WorkspaceContext,
};
use filepilot_tools::{ToolSchema, get_default_tools};
use std::path::PathBuf;
use std::sync::Arc;

/// Schemas of every tool offered for `root`
pub fn tool_schemas(root: PathBuf, config: BulkOpsConfig) -> anyhow::Result<Vec<ToolSchema>> {
    let fs = Arc::new(
        LocalFileSystem::with_config(&root, &config)
            .context("Invalid ignore pattern in configuration")?,
    );
    let resolver: Arc<dyn ReferenceResolver> =
        Arc::new(ImportReferenceResolver::with_config(fs.clone(), &root, &config));
    let tools = get_default_tools(WorkspaceContext::new(root), fs, Some(resolver), config);
    Ok(tools.iter().map(|tool| tool.schema()).collect())
}

/// Run `filepilot schema`
pub fn execute(root: PathBuf, config: BulkOpsConfig) -> anyhow::Result<()> {
    let schemas = tool_schemas(root, config)?;
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}
