use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CuratorError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u32,
}

fn default_db_path() -> PathBuf {
    curator_dir().join("curator.db")
}

fn default_busy_timeout() -> u32 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

/// Returns the Curator data directory: ~/.curator
pub fn curator_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".curator")
}

/// Returns the path to the config file.
pub fn config_path() -> PathBuf {
    curator_dir().join("config.toml")
}

/// Load config from disk, returning defaults if the file doesn't exist.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| CuratorError::Config(e.to_string()))
}

/// Ensure the directory holding the database exists.
pub fn ensure_dirs(config: &Config) -> Result<()> {
    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.database.busy_timeout_ms, 5000);
        assert!(config.database.path.ends_with("curator.db"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\npath = \"/var/lib/curator/state.db\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/curator/state.db")
        );
        assert_eq!(config.database.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, CuratorError::Config(_)));
    }

    #[test]
    fn test_ensure_dirs_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("nested").join("curator.db");

        ensure_dirs(&config).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
