//! Client settings loaded from `config.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Smallest panel that still fits header, actions, log and input.
pub const MIN_PANEL_WIDTH: u16 = 30;
pub const MIN_PANEL_HEIGHT: u16 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for the chat client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of the backend; requests go to `{endpoint}/chat`.
    pub endpoint: String,
    /// Author shown on the user's own event log entries.
    pub user_name: String,
    /// Author used when the backend does not name an agent.
    pub assistant_name: String,
    pub panel_width: u16,
    pub panel_height: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000".to_string(),
            user_name: "Aryan".to_string(),
            assistant_name: "Shopping Assistant".to_string(),
            panel_width: 68,
            panel_height: 22,
        }
    }
}

impl ChatConfig {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.panel_width < MIN_PANEL_WIDTH || self.panel_height < MIN_PANEL_HEIGHT {
            return Err(ConfigError::Invalid(format!(
                "panel must be at least {}x{}, got {}x{}",
                MIN_PANEL_WIDTH, MIN_PANEL_HEIGHT, self.panel_width, self.panel_height
            )));
        }
        Ok(())
    }
}
