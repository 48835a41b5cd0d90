//! CLI argument definitions using clap
//!
//! - filepilot apply actions.json      # Apply a batch of file operations
//! - filepilot find "**/*.ts"          # List matching files
//! - filepilot schema                  # Print the agent tool schemas

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file name, looked up in the workspace root.
pub const DEFAULT_CONFIG_FILE: &str = "filepilot.toml";

#[derive(Debug, Parser)]
#[command(name = "filepilot")]
#[command(about = "Filepilot - safe bulk file operations with reference updates")]
#[command(version)]
pub struct Cli {
    /// Workspace root (default: current directory)
    #[arg(long, global = true, env = "FILEPILOT_ROOT")]
    pub root: Option<PathBuf>,

    /// Path to configuration file (default: <root>/filepilot.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply a JSON list of actions as one transaction
    Apply {
        /// File holding the actions, or `-` for stdin
        file: PathBuf,

        /// Only expand and validate, change nothing
        #[arg(long)]
        dry_run: bool,

        /// Treat the workspace as untrusted
        #[arg(long)]
        untrusted: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find files by glob pattern
    Find {
        /// Glob pattern relative to the workspace root
        pattern: String,

        /// Maximum number of files to list
        #[arg(long)]
        max_results: Option<usize>,
    },

    /// Print the agent tool schemas as JSON
    Schema,
}

impl Cli {
    /// Workspace root, falling back to the current directory
    pub fn workspace_root(&self) -> std::io::Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir(),
        }
    }

    /// Configuration file to load
    pub fn config_path(&self, root: &std::path::Path) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| root.join(DEFAULT_CONFIG_FILE))
    }
}
