//! TOML-based application configuration.
//!
//! Stores the sync strategy selection, the mirror poll interval, and the
//! administrator gate secret. Stored at `~/.config/bookroom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, CoreError};
use crate::store::data_dir;

/// Which sync transport a running instance uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStrategy {
    /// Live store subscription plus the mirror poll. Works across devices.
    #[default]
    RemoteSubscription,
    /// Same-device broadcast bus only.
    CrossTab,
}

/// Synchronization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub strategy: SyncStrategy,
    /// Mirror poll cadence for the remote-subscription transport.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Administrator gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_password")]
    pub password: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/bookroom/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

fn default_poll_interval_ms() -> u64 {
    5000
}
fn default_true() -> bool {
    true
}
fn default_password() -> String {
    "admin123".into()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: SyncStrategy::default(),
            poll_interval_ms: default_poll_interval_ms(),
            enabled: true,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: default_password(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| {
                    CoreError::Config(ConfigError::LoadFailed {
                        path,
                        message: e.to_string(),
                    })
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| {
            CoreError::Config(ConfigError::SaveFailed {
                path: path.clone(),
                message: e.to_string(),
            })
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error. Never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.sync.strategy, SyncStrategy::RemoteSubscription);
        assert_eq!(parsed.sync.poll_interval_ms, 5000);
        assert!(parsed.sync.enabled);
        assert_eq!(parsed.admin.password, "admin123");
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.sync.poll_interval_ms, 5000);
        assert_eq!(parsed.admin.password, "admin123");
    }

    #[test]
    fn strategy_uses_kebab_case_discriminators() {
        let parsed: Config = toml::from_str(
            "[sync]\nstrategy = \"cross-tab\"\npoll_interval_ms = 250\n",
        )
        .unwrap();
        assert_eq!(parsed.sync.strategy, SyncStrategy::CrossTab);
        assert_eq!(parsed.sync.poll_interval_ms, 250);
    }
}
