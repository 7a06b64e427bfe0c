//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "logEvents": true },
//!   "storage": { "databaseFile": "cashflow.duckdb" }
//! }
//! ```
//! Keys this crate does not manage are kept as-is when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_DATABASE_FILE: &str = "cashflow.duckdb";

/// Environment variable that overrides `app.logEvents`
pub const LOG_EVENTS_ENV: &str = "CASHFLOW_LOG_EVENTS";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    storage: StorageSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default = "default_true")]
    log_events: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_events: true,
            other: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageSettings {
    #[serde(default = "default_database_file")]
    database_file: String,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            other: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_database_file() -> String {
    DEFAULT_DATABASE_FILE.to_string()
}

/// Parse a boolean flag value as accepted in environment variables
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Cashflow configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether command events are written to `logs.duckdb`
    pub log_events: bool,
    /// Statement database file name, relative to the data directory
    pub database_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_events: true,
            database_file: default_database_file(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or unreadable settings file yields the defaults.
    /// `CASHFLOW_LOG_EVENTS` overrides the logging flag.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;

        let log_events = std::env::var(LOG_EVENTS_ENV)
            .ok()
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(raw.app.log_events);

        Ok(Self {
            log_events,
            database_file: raw.storage.database_file,
        })
    }

    /// Save config to the data directory, keeping keys we don't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;
        settings.app.log_events = self.log_events;
        settings.storage.database_file = self.database_file.clone();

        let path = data_dir.join(SETTINGS_FILE);
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Full path of the statement database
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database_file)
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let path = data_dir.join(SETTINGS_FILE);
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = read_settings(dir.path()).unwrap();
        assert!(config.app.log_events);
        assert_eq!(config.storage.database_file, "cashflow.duckdb");
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        let config = read_settings(dir.path()).unwrap();
        assert_eq!(config.storage.database_file, "cashflow.duckdb");
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"app":{"logEvents":true,"theme":"dark"},"storage":{"databaseFile":"mine.duckdb"},"plugins":{"x":1}}"#,
        )
        .unwrap();

        let config = Config {
            log_events: false,
            database_file: "mine.duckdb".to_string(),
        };
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["app"]["logEvents"], false);
        assert_eq!(saved["app"]["theme"], "dark");
        assert_eq!(saved["storage"]["databaseFile"], "mine.duckdb");
        assert_eq!(saved["plugins"]["x"], 1);
    }

    #[test]
    fn test_database_path_joins_data_dir() {
        let config = Config::default();
        assert_eq!(
            config.database_path(Path::new("/tmp/cf")),
            PathBuf::from("/tmp/cf/cashflow.duckdb")
        );
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
