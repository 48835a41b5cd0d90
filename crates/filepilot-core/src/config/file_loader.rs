//! File-based configuration loading

use super::FilePilotConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config '{}': {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load configuration from a file
///
/// Supports TOML and JSON based on the file extension (anything that is not
/// `.toml` is read as JSON). Returns the default config if the file doesn't
/// exist.
pub fn load_from_file(path: &Path) -> Result<FilePilotConfig, ConfigError> {
    if !path.exists() {
        return Ok(FilePilotConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?,
        _ => serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?,
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_from_file(&temp_dir.path().join("filepilot.toml")).unwrap();
        assert_eq!(config, FilePilotConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("filepilot.toml");
        let config_toml = r#"
[bulk]
max_results = 50
update_references = false
holding_area = "/tmp/held"

[logging]
level = "debug"
"#;
        fs::write(&config_path, config_toml).unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.bulk.max_results, 50);
        assert!(!config.bulk.update_references);
        assert_eq!(config.bulk.holding_area, PathBuf::from("/tmp/held"));
        // Unset fields keep their defaults
        assert!(!config.bulk.reference_extensions.is_empty());
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("filepilot.json");
        fs::write(
            &config_path,
            r#"{"bulk": {"ignore_patterns": ["**/dist/**"]}, "logging": {"format": "json"}}"#,
        )
        .unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.bulk.ignore_patterns, vec!["**/dist/**".to_string()]);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("filepilot.toml");
        fs::write(&config_path, "[bulk\nmax_results = ").unwrap();
        assert!(matches!(
            load_from_file(&config_path),
            Err(ConfigError::Toml { .. })
        ));
    }
}
