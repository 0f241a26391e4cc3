//! Configuration for the eliza-chat client.
//!
//! Settings come from built-in defaults, an optional JSON file, and finally
//! command-line overrides applied by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::turn::DEFAULT_GREETING;

/// Directory name used under the platform config/data dirs.
pub const APP_DIR: &str = "eliza-chat";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the ELIZA web service.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Timeout in seconds for each HTTP request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Greeting shown as the first responder turn.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Whether to send the transcript to the service after each exchange.
    #[serde(default = "default_persist_sessions")]
    pub persist_sessions: bool,

    /// Directory for log files (defaults to the platform data dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_greeting() -> String {
    DEFAULT_GREETING.into()
}

fn default_persist_sessions() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_seconds: default_request_timeout(),
            greeting: default_greeting(),
            persist_sessions: default_persist_sessions(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load from an explicit path, or from the default location if it exists.
    ///
    /// A missing default file yields the built-in defaults; a missing explicit
    /// file is an error.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default config file location (`<config-dir>/eliza-chat/config.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// Directory log files are written to.
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("logs")
        })
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
