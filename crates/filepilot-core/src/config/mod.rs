//! Configuration management for Filepilot

mod bulk_config;
mod file_loader;
mod logging_config;

pub use bulk_config::BulkOpsConfig;
pub use file_loader::{ConfigError, load_from_file};
pub use logging_config::LoggingConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePilotConfig {
    /// Bulk engine settings
    pub bulk: BulkOpsConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl FilePilotConfig {
    /// Merge with another config, letting `other` win where it is set
    pub fn merge(&mut self, other: FilePilotConfig) {
        self.bulk.merge(other.bulk);
        self.logging.merge(other.logging);
    }
}
