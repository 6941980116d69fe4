//! Configuration management for tutorbook.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and `TUTORBOOK_` environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "tutorbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "tutorbook.db";

/// Slot key the whole record book is stored under.
pub const DEFAULT_SLOT_KEY: &str = "student-evaluation-data";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TUTORBOOK_`)
/// 2. TOML config file at `~/.config/tutorbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Derived view configuration.
    pub views: ViewsConfig,
    /// Backup configuration.
    pub backup: BackupConfig,
    /// Academy settings limits.
    pub settings: SettingsConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/tutorbook/tutorbook.db`
    pub database_path: Option<PathBuf>,
    /// Key of the slot holding the JSON document.
    pub slot_key: String,
}

/// Derived view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Days before today included in the recent-activity window.
    pub window_days: u32,
    /// Number of records taken for the latest-records report.
    pub latest_limit: usize,
    /// Records shown per student in the list view.
    pub list_records: usize,
}

/// Backup-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Directory exported backups are written to.
    /// Defaults to the current directory.
    pub export_dir: Option<PathBuf>,
}

/// Academy settings limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Largest logo image accepted, in bytes.
    pub max_logo_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            latest_limit: 8,
            list_records: 10,
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            max_logo_bytes: 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("TUTORBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.slot_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.slot_key must not be empty".to_string(),
            });
        }

        if self.views.latest_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "views.latest_limit must be greater than 0".to_string(),
            });
        }

        if self.settings.max_logo_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "settings.max_logo_bytes must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the backup export directory, resolving defaults if not set.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.backup
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the recent-activity window length in days back from today.
    #[must_use]
    pub fn window_days(&self) -> u64 {
        u64::from(self.views.window_days)
    }
}
