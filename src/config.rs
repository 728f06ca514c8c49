//! Configuration management for the SpinX server
//!
//! Defaults, TOML file loading, `SPINX_*` environment overrides and
//! validation in one place.

use crate::{
    errors::{ConfigurationError, SpinxResult},
    settings::GameSettings,
};
use serde::{Deserialize, Serialize};
use std::{env, fmt, path::Path, str::FromStr, time::Duration};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SpinxConfig {
    #[serde(default)]
    pub game: GameSettings,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

/// RocksDB tuning for the player database
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: String,
    pub write_buffer_size_mb: usize,
    pub compression_type: CompressionType,
    /// Wipe the database when opening it (testing only)
    pub clear_on_start: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionType {
    None,
    Snappy,
    Lz4,
    Zstd,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_directory: "./DB/spinx_data".to_string(),
            write_buffer_size_mb: 64,
            compression_type: CompressionType::Lz4,
            clear_on_start: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigurationError::InvalidValue {
                field: "log_level".to_string(),
                value: s.to_string(),
                reason: "Expected one of error, warn, info, debug, trace".to_string(),
            }),
        }
    }
}

/// Configuration loader with environment variable support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file (if any) and environment, then validate
    pub fn load(&self) -> SpinxResult<SpinxConfig> {
        let mut config = match self.config_path {
            Some(ref path) => self.load_from_file(path)?,
            None => SpinxConfig::default(),
        };

        apply_overrides(&mut config, |key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> SpinxResult<SpinxConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into())
    }

    pub fn save(&self, config: &SpinxConfig, path: &str) -> SpinxResult<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into())
    }
}

fn parse_field<T: FromStr>(key: &str, raw: String, reason: &str) -> Result<T, ConfigurationError> {
    raw.trim().parse().map_err(|_| ConfigurationError::InvalidValue {
        field: key.to_string(),
        value: raw.clone(),
        reason: reason.to_string(),
    })
}

/// Apply `SPINX_*` overrides read through `lookup`
pub fn apply_overrides<F>(config: &mut SpinxConfig, lookup: F) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(rows) = lookup("SPINX_REEL_ROWS") {
        config.game.reel_rows = parse_field("SPINX_REEL_ROWS", rows, "Invalid row count")?;
    }
    if let Some(cols) = lookup("SPINX_REEL_COLUMNS") {
        config.game.reel_columns = parse_field("SPINX_REEL_COLUMNS", cols, "Invalid column count")?;
    }
    if let Some(dir) = lookup("SPINX_DATA_DIR") {
        config.storage.data_directory = dir;
    }
    if let Some(host) = lookup("SPINX_API_HOST") {
        config.api.host = host;
    }
    if let Some(port) = lookup("SPINX_API_PORT") {
        config.api.port = parse_field("SPINX_API_PORT", port, "Invalid port number")?;
    }
    if let Some(level) = lookup("SPINX_LOG_LEVEL") {
        config.monitoring.log_level = level.parse()?;
    }
    Ok(())
}

impl SpinxConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.game.validate()?;

        if self.api.port == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "api.port".to_string(),
                value: "0".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "api.request_timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "Request timeout must be greater than zero".to_string(),
            });
        }

        if self.storage.data_directory.trim().is_empty() {
            return Err(ConfigurationError::MissingRequired("storage.data_directory".to_string()));
        }

        Ok(())
    }
}

/// Write a default configuration file to `path`
pub fn generate_sample_config(path: &str) -> SpinxResult<()> {
    ConfigLoader::new().save(&SpinxConfig::default(), path)
}
