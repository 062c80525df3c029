//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub token: Option<String>,
    #[serde(default)]
    pub admin_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("bot_data.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    /// Long-polling timeout for getUpdates
    pub poll_timeout_secs: i64,
    /// Caller id used by the console adapter
    pub console_user_id: i64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 30,
            console_user_id: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "qrbot".to_string(),
                token: None,
                admin_ids: Vec::new(),
            },
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Load the file if it exists, then apply environment overrides
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            tracing::info!("No config file at {}, using defaults", path.display());
            Config::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("BOT_TOKEN").filter(|t| !t.trim().is_empty()) {
            self.bot.token = Some(token.trim().to_string());
        }

        if let Some(ids) = lookup("ADMIN_IDS") {
            self.bot.admin_ids = parse_admin_ids(&ids)?;
        }

        if let Some(path) = lookup("DATABASE_PATH") {
            self.storage.database = PathBuf::from(path);
        }

        if let Some(dir) = lookup("LOG_DIR") {
            self.logging.directory = PathBuf::from(dir);
        }

        Ok(())
    }

    pub fn admin_set(&self) -> HashSet<i64> {
        self.bot.admin_ids.iter().copied().collect()
    }
}

/// Parse a comma-separated list of numeric ids, skipping blanks
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue(format!("ADMIN_IDS entry '{}' is not an integer", s)))
        })
        .collect()
}
