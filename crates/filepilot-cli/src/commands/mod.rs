//! CLI commands

pub mod apply;
pub mod find;
pub mod schema;

use crate::args::{Cli, Commands};
use filepilot_core::FilePilotConfig;
use std::path::PathBuf;

/// Route the parsed command to its handler
pub async fn route(cli: Cli, root: PathBuf, config: FilePilotConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Apply {
            file,
            dry_run,
            untrusted,
            json,
        } => {
            let options = apply::ApplyOptions {
                dry_run,
                trusted: !untrusted,
                json,
                verbose: cli.verbose,
            };
            apply::execute(&file, root, config.bulk, options).await
        }
        Commands::Find {
            pattern,
            max_results,
        } => find::execute(&pattern, root, config.bulk, max_results).await,
        Commands::Schema => schema::execute(root, config.bulk),
    }
}
