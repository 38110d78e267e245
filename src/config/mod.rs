//! Configuration management for konto-console.
//!
//! Handles:
//! - Backend endpoint and request timeout
//! - Session behavior (stale reply policy)
//! - Export destination for downloaded sheets

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{KontoError, Result};
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load the default configuration with an explicit file merged on top.
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        Self::layered(Self::load(), explicit)
    }

    /// Merge an explicit file over an already loaded user config. An
    /// unreadable user config is logged and replaced by the defaults; the
    /// explicit file must load.
    fn layered(user: Result<Self>, explicit: Option<&Path>) -> Result<Self> {
        let mut config = match user {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable user config, using defaults");
                Self::default()
            }
        };

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(KontoError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            let overlay = Self::load_from(path)?;
            config.merge_from(&overlay);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KontoError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| KontoError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Merge another config into this one (other takes precedence where it
    /// differs from the defaults).
    pub fn merge_from(&mut self, other: &Config) {
        let defaults = Config::default();

        if other.server.url != defaults.server.url {
            self.server.url = other.server.url.clone();
        }
        if other.server.command_path != defaults.server.command_path {
            self.server.command_path = other.server.command_path.clone();
        }
        if other.server.timeout_secs != defaults.server.timeout_secs {
            self.server.timeout_secs = other.server.timeout_secs;
        }
        if other.server.user_agent != defaults.server.user_agent {
            self.server.user_agent = other.server.user_agent.clone();
        }

        if other.session.stale_replies != defaults.session.stale_replies {
            self.session.stale_replies = other.session.stale_replies;
        }

        if other.export.directory.is_some() {
            self.export.directory = other.export.directory.clone();
        }
        if other.export.file_name != defaults.export.file_name {
            self.export.file_name = other.export.file_name.clone();
        }
    }

    /// Check values a file may have set to something unusable.
    pub fn validate(&self) -> Result<()> {
        if self.server.url.trim().is_empty() {
            return Err(KontoError::InvalidConfig {
                message: "server.url must not be empty".to_string(),
            });
        }
        if !self.server.command_path.starts_with('/') {
            return Err(KontoError::InvalidConfig {
                message: format!(
                    "server.command_path must start with '/', got '{}'",
                    self.server.command_path
                ),
            });
        }
        if self.server.timeout_secs == 0 {
            return Err(KontoError::InvalidConfig {
                message: "server.timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path, atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| KontoError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())
    }
}

/// Backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the backend.
    #[serde(default = "default_url")]
    pub url: String,
    /// Path of the command endpoint.
    #[serde(default = "default_command_path")]
    pub command_path: String,
    /// Bound on one command round-trip, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ServerConfig {
    /// Full URL of the command endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.command_path)
    }

    /// Round-trip timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            command_path: default_command_path(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// What to do with a reply older than the last one applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalePolicy {
    /// Apply every reply in arrival order; the last one to arrive wins.
    #[default]
    Apply,
    /// Drop replies whose request was issued before the last applied one.
    Ignore,
}

/// Session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Stale reply policy.
    #[serde(default)]
    pub stale_replies: StalePolicy,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Target directory (current directory when unset).
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// File name of exported sheets.
    #[serde(default = "default_export_file")]
    pub file_name: String,
}

impl ExportConfig {
    /// Directory exports are written to.
    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: default_export_file(),
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_command_path() -> String {
    "/konto".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("konto-console/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_export_file() -> String {
    "grundbuchblaetter.zip".to_string()
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| KontoError::Unsupported {
        feature: "config directory discovery".to_string(),
    })?;

    Ok(config_dir.join("konto-console").join("config.toml"))
}
