//! # Back-Office Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VERDANT_DB_PATH=/srv/verdant/backoffice.db                         │
//! │     VERDANT_OPERATOR_ID=emp-007                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/verdant-backoffice/backoffice.toml (Linux)               │
//! │     ~/Library/Application Support/com.verdant.backoffice/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # backoffice.toml
//! store_name = "Verdant Dispensary"
//! currency_symbol = "$"
//! database_path = "/srv/verdant/backoffice.db"
//! seed_on_empty = true
//!
//! [operator]
//! id = "emp-007"
//! name = "Jordan"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use verdant_core::Operator;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "backoffice.toml";

/// File name used in the platform data directory when no path is configured.
pub const DATABASE_FILE_NAME: &str = "backoffice.db";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the platform data directory")]
    NoDataDir,

    #[error("Failed to create data directory {path}: {reason}")]
    CreateDirFailed { path: PathBuf, reason: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// AppConfig
// =============================================================================

/// Identity recorded on sale logs and register sessions when the caller
/// does not supply one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub id: String,
    pub name: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        OperatorConfig {
            id: "backoffice".to_string(),
            name: "Back Office".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Store name (shown in the CLI status output)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Database file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Write the example records when the database is empty at startup.
    pub seed_on_empty: bool,

    pub operator: OperatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store_name: "Verdant Dispensary".to_string(),
            currency_symbol: "$".to_string(),
            database_path: None,
            seed_on_empty: true,
            operator: OperatorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`backoffice.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading back-office config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load back-office config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::Invalid("store_name must not be empty".into()));
        }
        if self.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "currency_symbol must not be empty".into(),
            ));
        }
        if self.operator.id.trim().is_empty() {
            return Err(ConfigError::Invalid("operator.id must not be empty".into()));
        }
        if self.operator.name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "operator.name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Applies `VERDANT_*` overrides read through `lookup`.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("VERDANT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("VERDANT_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(id) = lookup("VERDANT_OPERATOR_ID") {
            debug!(operator_id = %id, "Overriding operator from environment");
            self.operator.id = id;
        }

        if let Some(name) = lookup("VERDANT_OPERATOR_NAME") {
            self.operator.name = name;
        }

        if let Some(symbol) = lookup("VERDANT_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "verdant", "backoffice")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Determines the database file path.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.verdant.backoffice/backoffice.db`
    /// - **Windows**: `%APPDATA%\verdant\backoffice\data\backoffice.db`
    /// - **Linux**: `~/.local/share/backoffice/backoffice.db`
    ///
    /// The parent directory is created if missing.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        let path = match &self.database_path {
            Some(path) => path.clone(),
            None => {
                let dirs = Self::project_dirs().ok_or(ConfigError::NoDataDir)?;
                dirs.data_dir().join(DATABASE_FILE_NAME)
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirFailed {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        Ok(path)
    }

    /// Operator used when a command is not given one.
    pub fn operator(&self) -> Operator {
        Operator {
            id: self.operator.id.clone(),
            name: self.operator.name.clone(),
        }
    }

    /// Formats a cent amount with the configured symbol.
    ///
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol,
            abs / 100,
            abs % 100
        )
    }
}
