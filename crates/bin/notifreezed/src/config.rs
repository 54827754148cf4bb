//! Configuration loading — TOML file with environment variable overrides.
//!
//! Reads `notifreeze.toml` from the working directory, or the file named by
//! `NOTIFREEZE_CONFIG`. The file is optional; environment variables take
//! precedence over file values.

use notifreeze_adapter_virtual::VirtualConfig;
use notifreeze_domain::config::NotiFreezeConfig;
use serde::Deserialize;

const DEFAULT_PATH: &str = "notifreeze.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// The freeze monitor itself.
    pub notifreeze: NotiFreezeConfig,
    /// Simulated entities and scenario.
    #[serde(rename = "virtual")]
    pub virtual_host: VirtualConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed or unreadable.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("NOTIFREEZE_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("NOTIFREEZE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "notifreezed=info,notifreeze=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
}
