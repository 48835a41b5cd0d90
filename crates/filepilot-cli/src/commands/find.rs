//! Find command implementation

use anyhow::Context;
use filepilot_core::workspace::to_slash;
use filepilot_core::{BulkOpsConfig, FileSystem, LocalFileSystem};
use std::path::{Path, PathBuf};

/// List workspace-relative paths matching `pattern`
pub async fn find_files(
    fs: &dyn FileSystem,
    root: &Path,
    pattern: &str,
    max_results: usize,
) -> anyhow::Result<Vec<String>> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        anyhow::bail!("Pattern must not be empty.");
    }
    let matches = fs
        .find_matches(root, pattern, max_results)
        .await
        .with_context(|| format!("Failed to search for '{}'", pattern))?;
    Ok(matches
        .iter()
        .map(|path| to_slash(path.strip_prefix(root).unwrap_or(path)))
        .collect())
}

/// Run `filepilot find`
pub async fn execute(
    pattern: &str,
    root: PathBuf,
    config: BulkOpsConfig,
    max_results: Option<usize>,
) -> anyhow::Result<()> {
    let limit = max_results.unwrap_or(config.max_results);
    let fs = LocalFileSystem::with_config(&root, &config)
        .context("Invalid ignore pattern in configuration")?;

    let files = find_files(&fs, &root, pattern, limit).await?;
    if files.is_empty() {
        tracing::info!(pattern, "No files matched");
    }
    for file in &files {
        println!("{}", file);
    }
    Ok(())
}
