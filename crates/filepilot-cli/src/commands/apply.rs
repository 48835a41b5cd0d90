//! Apply command implementation

use crate::console::CliConsole;
use anyhow::Context;
use filepilot_core::{
    Action, BatchResult, BulkOpError, BulkOperationOrchestrator, BulkOpsConfig,
    ImportReferenceResolver, LocalFileSystem, ReferenceResolver, ResolvedAction, UnifiedError,
    WorkspaceContext,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Flags of `filepilot apply`
#[derive(Debug, Clone, Copy)]
pub struct ApplyOptions {
    pub dry_run: bool,
    pub trusted: bool,
    pub json: bool,
    pub verbose: bool,
}

/// Read actions from a file, or from stdin for `-`.
///
/// Accepts either a bare array or an object with an `actions` array.
pub fn read_actions(file: &Path) -> anyhow::Result<Vec<Action>> {
    let content = if file == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read actions from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read actions file '{}'", file.display()))?
    };
    parse_actions(&content)
}

fn parse_actions(content: &str) -> anyhow::Result<Vec<Action>> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("Actions file is not valid JSON")?;
    let list = match value {
        serde_json::Value::Object(mut map) => map
            .remove("actions")
            .context("Expected an array of actions or an object with an 'actions' field")?,
        other => other,
    };
    serde_json::from_value(list).context("Malformed action list")
}

/// Run `filepilot apply`
pub async fn execute(
    file: &Path,
    root: PathBuf,
    config: BulkOpsConfig,
    options: ApplyOptions,
) -> anyhow::Result<()> {
    let console = CliConsole::new(options.verbose);
    let actions = read_actions(file)?;

    let fs = Arc::new(
        LocalFileSystem::with_config(&root, &config)
            .context("Invalid ignore pattern in configuration")?,
    );
    let resolver: Arc<dyn ReferenceResolver> =
        Arc::new(ImportReferenceResolver::with_config(fs.clone(), &root, &config));
    let orchestrator = BulkOperationOrchestrator::new(fs)
        .with_resolver(resolver)
        .with_config(config);
    let ctx = WorkspaceContext::new(root).with_trust(options.trusted);

    if options.dry_run {
        let resolved = orchestrator
            .preview(&ctx, &actions)
            .await
            .map_err(|e| report(&console, e))?;
        if options.json {
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        } else {
            print_preview(&console, &resolved);
        }
        return Ok(());
    }

    let on_progress = |message: &str| console.info(message);
    let result = orchestrator
        .run(&ctx, &actions, Some(&on_progress))
        .await
        .map_err(|e| report(&console, e))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&console, &result);
    }
    if !result.is_success() {
        anyhow::bail!("{} operation(s) failed", result.failed_count);
    }
    Ok(())
}

fn report(console: &CliConsole, err: BulkOpError) -> anyhow::Error {
    console.error(&format!("[{}] {}", err.error_code(), err));
    anyhow::Error::new(err)
}

fn print_preview(console: &CliConsole, resolved: &[ResolvedAction]) {
    console.print_header(&format!("Dry run: {} operation(s)", resolved.len()));
    for action in resolved {
        let line = match action.target() {
            Some(target) => format!(
                "{} {} -> {}",
                action.kind(),
                action.source().relative,
                target.relative
            ),
            None => format!("{} {}", action.kind(), action.source().relative),
        };
        console.print_operation(true, &line);
    }
}

fn print_result(console: &CliConsole, result: &BatchResult) {
    console.print_header("Bulk operation");
    for op in &result.operations {
        let mut line = format!("{} {}", op.kind, op.source.as_deref().unwrap_or_default());
        if let Some(target) = &op.target {
            line.push_str(&format!(" -> {}", target));
        }
        if let Some(error) = &op.error {
            line.push_str(&format!(": {}", error));
        }
        console.print_operation(op.success, &line);
    }
    println!();

    let summary = format!(
        "{}, {} reference(s) updated",
        result.summary(),
        result.total_references_updated
    );
    if result.is_success() {
        console.success(&summary);
    } else {
        console.warn(&summary);
    }
}
