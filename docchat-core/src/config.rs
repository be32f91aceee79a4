//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/docchat/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/docchat/` (~/.config/docchat/)
//! - State/Logs: `$XDG_STATE_HOME/docchat/` (~/.local/state/docchat/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Question-answering backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Base URL the six routes hang off (e.g. `http://127.0.0.1:5000`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional whole-request timeout in seconds.
    ///
    /// Unset means requests wait until the transport itself gives up.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl BackendConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(Error::Config("backend.base_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "backend.base_url must start with http:// or https:// (got {:?})",
                url
            )));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(Error::Config(
                "backend.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim().trim_end_matches('/').to_string()
    }

    /// Configured request timeout, if any
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.backend.validate()?;
        Ok(config)
    }

    /// Replace the backend URL (command-line override)
    pub fn with_backend_url(mut self, url: Option<String>) -> Result<Self> {
        if let Some(url) = url {
            self.backend.base_url = url;
            self.backend.validate()?;
        }
        Ok(self)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/docchat/config.toml` (~/.config/docchat/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("docchat").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/docchat/` (~/.local/state/docchat/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("docchat")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/docchat/docchat.log` (~/.local/state/docchat/docchat.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("docchat.log")
    }
}
