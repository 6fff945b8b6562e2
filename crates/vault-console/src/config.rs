//! # Configuration Persistence
//!
//! Save and load console settings to/from disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding [`Config::server_url`].
pub const SERVER_URL_ENV: &str = "VAULT_CONSOLE_URL";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8090";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while persisting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no config directory.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// Reading or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be encoded.
    #[error("failed to serialize config: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Vault backend.
    pub server_url: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Where the session is persisted. Defaults to the platform data dir.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_path: None,
        }
    }
}

impl Config {
    /// Returns the config file path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vault-console").join("config.json"))
    }

    /// Loads configuration from the platform config dir, then applies
    /// environment overrides. Falls back to defaults if no file exists.
    #[must_use]
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("Could not determine config directory");
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    /// Loads configuration from `path`, or returns defaults if the file is
    /// missing or unreadable.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(?path, "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Applies [`SERVER_URL_ENV`] if it is set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!(url = %url, "Server URL overridden from environment");
                self.server_url = url;
            }
        }
    }

    /// Returns the file backing the persisted session.
    #[must_use]
    pub fn session_path(&self) -> Option<PathBuf> {
        self.storage_path.clone().or_else(|| {
            dirs::data_local_dir().map(|p| p.join("vault-console").join("session.json"))
        })
    }

    /// Edits the config file in the platform config dir.
    ///
    /// Environment overrides are not applied, so they never end up on disk.
    ///
    /// # Errors
    ///
    /// Fails if there is no config dir or the file cannot be written.
    pub fn update(f: impl FnOnce(&mut Self)) -> Result<Self, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::update_at(&path, f)
    }

    /// Loads the file at `path`, applies `f` and writes the result back.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn update_at(path: &Path, f: impl FnOnce(&mut Self)) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path);
        f(&mut config);
        config.save_to(path)?;
        Ok(config)
    }

    /// Saves configuration to the platform config dir.
    ///
    /// # Errors
    ///
    /// Fails if there is no config dir or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Saves configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        tracing::info!(?path, "Saved configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json"));

        assert_eq!(config, Config::default());
        assert_eq!(config.server_url, "http://127.0.0.1:8090");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            server_url: "https://vault.example.com".to_string(),
            request_timeout_secs: 5,
            storage_path: Some(dir.path().join("session.json")),
        };

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"server_url":"http://localhost:9000"}"#).unwrap();

        let config = Config::load_from(&path);

        assert_eq!(config.server_url, "http://localhost:9000");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.storage_path.is_none());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{{{").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_explicit_storage_path_wins() {
        let config = Config {
            storage_path: Some(PathBuf::from("/tmp/session.json")),
            ..Config::default()
        };
        assert_eq!(config.session_path(), Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn test_update_at_keeps_unchanged_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let original = Config {
            request_timeout_secs: 5,
            ..Config::default()
        };
        original.save_to(&path).unwrap();

        let updated = Config::update_at(&path, |c| {
            c.server_url = "https://vault.example.com".to_string();
        })
        .unwrap();

        let reloaded = Config::load_from(&path);
        assert_eq!(reloaded.server_url, "https://vault.example.com");
        assert_eq!(reloaded.request_timeout_secs, 5);
        assert_eq!(reloaded.server_url, updated.server_url);
    }
}
