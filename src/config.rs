//! Configuration loading and management
//!
//! Handles parsing of `habit.toml` in the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::range::ProgressRange;
use crate::storage::CONFIG_FILE;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Owner identity configuration
    #[serde(default)]
    pub account: AccountConfig,

    /// Store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Analytics defaults
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Account-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Owner used when none is given or persisted
    #[serde(default = "default_owner")]
    pub default_owner: String,
}

fn default_owner() -> String {
    "me".to_string()
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            default_owner: default_owner(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// How long a command waits for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Range used by `habit progress` without `--range`
    #[serde(default = "default_range")]
    pub default_range: String,
}

fn default_range() -> String {
    ProgressRange::default().label().to_string()
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_range: default_range(),
        }
    }
}

impl AnalyticsConfig {
    pub fn range(&self) -> ProgressRange {
        ProgressRange::parse_lenient(&self.default_range)
    }
}

impl Config {
    /// Load and validate configuration from a `habit.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "ignoring unreadable config"
                );
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.account.default_owner.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "account.default_owner cannot be empty".to_string(),
            ));
        }
        if self.storage.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if ProgressRange::from_label(&self.analytics.default_range).is_none() {
            return Err(Error::InvalidConfig(format!(
                "analytics.default_range: invalid range '{}' (expected 7d|30d|6m)",
                self.analytics.default_range
            )));
        }
        Ok(())
    }
}
