//! Configuration management for the AssetView daemon.
//!
//! This module provides TOML-based configuration file loading and saving.
//! The default configuration path is `~/.config/assetview/config.toml`.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_preview_size must be greater than 0, got {0}")]
    InvalidMaxPreviewSize(u64),

    #[error("assets root must be an absolute path, got {0}")]
    RelativeAssetRoot(PathBuf),

    #[error("assets_mount must start with '/' and must not shadow /api, got {0}")]
    InvalidAssetsMount(String),

    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Default asset root.
pub const DEFAULT_ASSETS_ROOT: &str = "/app/assets";

/// Main configuration structure for the AssetView daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// General daemon configuration.
    pub daemon: DaemonConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Asset root configuration.
    pub assets: AssetsConfig,
}

/// General daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DaemonConfig {
    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: SocketAddr,

    /// Directory holding the browser UI bundle, served at `/`.
    pub ui_dir: PathBuf,

    /// URL prefix under which raw asset files are served.
    pub assets_mount: String,
}

/// Asset root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory exposed by the service. Everything is confined beneath it.
    pub root: PathBuf,

    /// Largest file returned by the text preview, in bytes (default: 10MB).
    pub max_preview_size: u64,

    /// Hide and refuse symlinks whose target lies outside `root`.
    pub confine_symlinks: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            ui_dir: PathBuf::from("public"),
            assets_mount: "/assets".to_string(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ASSETS_ROOT),
            max_preview_size: 10 * 1024 * 1024, // 10MB
            confine_symlinks: true,
        }
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("assetview")
        .join("config.toml")
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - ASSETVIEW_ROOT: Override the asset root directory
    /// - ASSETVIEW_BIND: Override the listen address (e.g. 127.0.0.1:8080)
    /// - ASSETVIEW_LOG_LEVEL: Override log level (trace, debug, info, warn, error)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("ASSETVIEW_ROOT") {
            if !root.is_empty() {
                tracing::info!("Overriding assets root from environment: {}", root);
                self.assets.root = PathBuf::from(root);
            }
        }

        if let Ok(bind) = std::env::var("ASSETVIEW_BIND") {
            if !bind.is_empty() {
                match bind.parse() {
                    Ok(addr) => {
                        tracing::info!("Overriding bind address from environment: {}", bind);
                        self.server.bind = addr;
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring invalid ASSETVIEW_BIND {:?}: {}", bind, e);
                    }
                }
            }
        }

        if let Ok(level) = std::env::var("ASSETVIEW_LOG_LEVEL") {
            if !level.is_empty() {
                tracing::info!("Overriding log_level from environment: {}", level);
                self.daemon.log_level = level;
            }
        }
    }

    /// Validate the configuration values.
    ///
    /// Existence of the asset root is checked when the library is opened,
    /// not here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets.max_preview_size == 0 {
            return Err(ConfigError::InvalidMaxPreviewSize(
                self.assets.max_preview_size,
            ));
        }

        if !self.assets.root.is_absolute() {
            return Err(ConfigError::RelativeAssetRoot(self.assets.root.clone()));
        }

        let mount = &self.server.assets_mount;
        let shadows_api = mount == "/api" || mount.starts_with("/api/");
        if !mount.starts_with('/') || mount == "/" || shadows_api {
            return Err(ConfigError::InvalidAssetsMount(mount.clone()));
        }

        let level = self.daemon.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.daemon.log_level.clone()));
        }

        Ok(())
    }

    /// Load configuration from a file.
    ///
    /// If the file does not exist, returns the default configuration.
    /// If the file exists but is invalid TOML, returns an error with
    /// a helpful message.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("Invalid TOML configuration: {}", format_toml_error(&e)))
    }

    /// Save configuration to a file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// Format a TOML deserialization error for user-friendly display.
fn format_toml_error(error: &toml::de::Error) -> String {
    let mut msg = error.message().to_string();

    if let Some(span) = error.span() {
        msg.push_str(&format!(" (at position {}..{})", span.start, span.end));
    }

    msg
}
