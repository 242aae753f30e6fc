//! Configuration management for pokequery
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.pokequery/config.toml
//!
//! API keys are never read from this file; they come from flags or the
//! environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app::Strategy;
use crate::catalog::DataFormat;
use crate::errors::{QaError, Result};
use crate::models::{LocalModelConfig, OpenAiConfig};

/// Complete configuration for pokequery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub openai: OpenAiConfig,
    pub local: LocalModelConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: String,
    /// Explicit format; detected from the extension when absent
    pub format: Option<String>,
}

/// Front-end behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_strategy: String,
    pub history_file: String,
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "data/final_pokemon_dataset.csv".to_string(),
            format: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_strategy: "rag".to_string(),
            history_file: "~/.pokequery/history".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| QaError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| QaError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".pokequery").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.openai.max_tokens == 0 {
            return Err(QaError::ConfigError(
                "openai.max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.openai.rag_temperature) {
            return Err(QaError::ConfigError(
                "openai.rag_temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.local.max_length == 0 {
            return Err(QaError::ConfigError(
                "local.max_length must be greater than 0".to_string(),
            ));
        }

        if self.dataset.path.trim().is_empty() {
            return Err(QaError::ConfigError("dataset.path must be set".to_string()));
        }

        if let Some(format) = &self.dataset.format {
            format
                .parse::<DataFormat>()
                .map_err(|e| QaError::ConfigError(e.to_string()))?;
        }

        self.app
            .default_strategy
            .parse::<Strategy>()
            .map_err(|e| QaError::ConfigError(e.to_string()))?;

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(QaError::ConfigError(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Dataset path with tilde expanded
    pub fn dataset_path(&self) -> PathBuf {
        Self::expand_path(&self.dataset.path)
    }

    /// Dataset format, explicit or detected from the extension
    pub fn dataset_format(&self) -> Result<DataFormat> {
        match &self.dataset.format {
            Some(format) => format.parse(),
            None => DataFormat::from_path(&self.dataset_path()),
        }
    }

    /// Default answer strategy
    pub fn default_strategy(&self) -> Result<Strategy> {
        self.app.default_strategy.parse()
    }

    /// REPL history file path
    pub fn history_path(&self) -> PathBuf {
        Self::expand_path(&self.app.history_file)
    }
}
