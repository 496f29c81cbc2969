//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default: DefaultConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultConfig {
    #[serde(default = "default_source")]
    pub source: String,
}

/// Correlation feed configuration
///
/// The feed path for a trace is derived deterministically as
/// `<directory>/<trace file stem><suffix>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Directory holding the storage report files
    #[serde(default = "default_feed_directory")]
    pub directory: PathBuf,

    /// Suffix appended to the trace file stem
    #[serde(default = "default_feed_suffix")]
    pub suffix: String,

    /// Token symbol treated as the base currency when deriving transfer senders
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

// Default value functions

fn default_source() -> String {
    "file".to_string()
}

fn default_feed_directory() -> PathBuf {
    PathBuf::from("./addFiles")
}

fn default_feed_suffix() -> String {
    "_storage_report.json".to_string()
}

fn default_base_currency() -> String {
    "ETH".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            directory: default_feed_directory(),
            suffix: default_feed_suffix(),
            base_currency: default_base_currency(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.contract-trace-viz/config.toml
    /// 3. /etc/contract-trace-viz/config.toml
    pub fn load() -> Result<Self> {
        let paths = vec![
            PathBuf::from("config.toml"),
            dirs::home_dir()
                .map(|h| h.join(".contract-trace-viz").join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("/dev/null")),
            PathBuf::from("/etc/contract-trace-viz/config.toml"),
        ];

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Derive the correlation feed path for a trace display name
    ///
    /// The display name's extension is stripped and the configured suffix
    /// appended, mirroring the naming convention of the report generator.
    pub fn feed_path_for(&self, trace_name: &str) -> PathBuf {
        let stem = std::path::Path::new(trace_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(trace_name);
        self.feed.directory.join(format!("{}{}", stem, self.feed.suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default.source, "file");
        assert_eq!(config.feed.base_currency, "ETH");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[feed]
directory = "/data/reports"
base_currency = "BNB"

[logging]
level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.feed.directory, PathBuf::from("/data/reports"));
        assert_eq!(config.feed.base_currency, "BNB");
        assert_eq!(config.feed.suffix, "_storage_report.json");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_feed_path_for() {
        let config = Config::default();
        let path = config.feed_path_for("uniswap_swap.json");
        assert_eq!(
            path,
            PathBuf::from("./addFiles/uniswap_swap_storage_report.json")
        );
    }
}
