//! Filepilot CLI application
//!
//! Runs bulk file operations (rename, move, duplicate, delete) against a
//! workspace folder, updating import references for renames and moves.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/filepilot-cli
//! ```
//!
//! # Commands
//!
//! - `filepilot apply actions.json [--dry-run] [--json] [--untrusted]`
//! - `filepilot find "<pattern>" [--max-results N]`
//! - `filepilot schema`
//!
//! `--root` and `--config` apply to every command. Logging follows
//! `RUST_LOG`, falling back to the configured level.

mod args;
mod commands;
mod console;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use filepilot_core::config::load_from_file;
use filepilot_core::{FilePilotConfig, LoggingConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let root = cli
        .workspace_root()
        .context("Failed to determine the workspace root")?;
    let config_path = cli.config_path(&root);
    let mut config = FilePilotConfig::default();
    config.merge(load_from_file(&config_path)?);
    if cli.verbose {
        config.logging.merge(LoggingConfig {
            level: "debug".to_string(),
            format: String::new(),
        });
    }

    init_logging(&config.logging);
    tracing::debug!(root = %root.display(), config = %config_path.display(), "Starting filepilot");

    commands::route(cli, root, config).await
}

/// Initialize logging with environment-based filtering
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "filepilot={0},filepilot_core={0},filepilot_tools={0}",
            logging.level
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format.as_str() {
        "json" => builder.json().init(),
        "pretty" => builder.pretty().init(),
        _ => builder.compact().init(),
    }
}
