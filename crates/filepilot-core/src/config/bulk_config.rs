//! Bulk engine configuration

use crate::fs::pattern::DEFAULT_IGNORE_PATTERNS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for pattern expansion, deletes and reference updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkOpsConfig {
    /// Maximum number of files a single pattern may expand to
    pub max_results: usize,
    /// Globs excluded from searches, relative to the workspace root
    pub ignore_patterns: Vec<String>,
    /// Folder receiving deleted files; relative paths are joined to the root
    pub holding_area: PathBuf,
    /// Whether renames and moves update references in other files
    pub update_references: bool,
    /// File extensions scanned for import references
    pub reference_extensions: Vec<String>,
    /// Files larger than this are not scanned for references
    pub max_reference_file_bytes: u64,
}

impl Default for BulkOpsConfig {
    fn default() -> Self {
        Self {
            max_results: 1000,
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            holding_area: PathBuf::from(".filepilot/trash"),
            update_references: true,
            reference_extensions: ["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts", "vue", "svelte"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_reference_file_bytes: 1024 * 1024,
        }
    }
}

impl BulkOpsConfig {
    /// Merge with another bulk config
    pub fn merge(&mut self, other: BulkOpsConfig) {
        if other.max_results > 0 {
            self.max_results = other.max_results;
        }
        if !other.ignore_patterns.is_empty() {
            self.ignore_patterns = other.ignore_patterns;
        }
        if !other.holding_area.as_os_str().is_empty() {
            self.holding_area = other.holding_area;
        }
        self.update_references = other.update_references;
        if !other.reference_extensions.is_empty() {
            self.reference_extensions = other.reference_extensions;
        }
        if other.max_reference_file_bytes > 0 {
            self.max_reference_file_bytes = other.max_reference_file_bytes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_config_default() {
        let config = BulkOpsConfig::default();
        assert_eq!(config.max_results, 1000);
        assert!(config.update_references);
        assert!(config.ignore_patterns.iter().any(|p| p.contains("node_modules")));
        assert!(config.reference_extensions.contains(&"ts".to_string()));
    }

    #[test]
    fn test_bulk_config_merge_zero_max_results() {
        let mut config = BulkOpsConfig::default();
        let other = BulkOpsConfig {
            max_results: 0,
            update_references: false,
            ..BulkOpsConfig::default()
        };
        config.merge(other);
        // max_results of 0 should be ignored
        assert_eq!(config.max_results, 1000);
        assert!(!config.update_references);
    }
}
