//! Configuration management
//!
//! Settings live in settings.json in the data directory:
//! ```json
//! {
//!   "storage": { "key": "ipt_demo_v1", "quotaBytes": 5242880 },
//!   "logging": { "events": true }
//! }
//! ```
//! Keys this crate does not know about are kept when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::services::persistence::DEFAULT_SNAPSHOT_KEY;

/// Local storage limit most browsers apply per origin
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    storage: StorageSettings,
    #[serde(default)]
    logging: LoggingSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageSettings {
    #[serde(default = "default_key")]
    key: String,
    #[serde(default = "default_quota")]
    quota_bytes: Option<u64>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            key: default_key(),
            quota_bytes: default_quota(),
        }
    }
}

fn default_key() -> String {
    DEFAULT_SNAPSHOT_KEY.to_string()
}

fn default_quota() -> Option<u64> {
    Some(DEFAULT_QUOTA_BYTES)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoggingSettings {
    #[serde(default = "default_true")]
    events: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { events: true }
    }
}

fn default_true() -> bool {
    true
}

/// Staffdesk configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage slot holding the database snapshot
    pub storage_key: String,
    /// Combined size limit for all storage slots; `None` means unlimited
    pub quota_bytes: Option<u64>,
    /// Whether application events go to logs.jsonl
    pub event_log: bool,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: default_key(),
            quota_bytes: default_quota(),
            event_log: true,
            _raw_settings: SettingsFile::default(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// Environment overrides (for CI/testing):
    /// - STAFFDESK_EVENT_LOG: enable or disable the event log
    /// - STAFFDESK_QUOTA_BYTES: storage quota in bytes, `0` for unlimited
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let event_log = std::env::var("STAFFDESK_EVENT_LOG")
            .ok()
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(raw.logging.events);

        let quota_bytes = match std::env::var("STAFFDESK_QUOTA_BYTES")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            Some(0) => None,
            Some(bytes) => Some(bytes),
            None => raw.storage.quota_bytes,
        };

        let storage_key = if raw.storage.key.trim().is_empty() {
            default_key()
        } else {
            raw.storage.key.clone()
        };

        Ok(Self {
            storage_key,
            quota_bytes,
            event_log,
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.storage.key = self.storage_key.clone();
        settings.storage.quota_bytes = self.quota_bytes;
        settings.logging.events = self.event_log;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    pub fn settings_path(data_dir: &Path) -> std::path::PathBuf {
        data_dir.join("settings.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.storage_key, "ipt_demo_v1");
        assert!(!Config::settings_path(dir.path()).exists());
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            Config::settings_path(dir.path()),
            r#"{"theme": "dark", "storage": {"key": "custom_key", "quotaBytes": null}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        assert_eq!(config.storage_key, "custom_key");

        config.storage_key = "renamed".to_string();
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(Config::settings_path(dir.path())).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["storage"]["key"], "renamed");
    }

    #[test]
    fn test_bool_parsing() {
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
