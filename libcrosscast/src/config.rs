//! Configuration management for Crosscast clients.
//!
//! The TUI and CLI read a small TOML file pointing them at the
//! gateway. The gateway itself is configured from the environment
//! (credentials never live in this file).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::types::Platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gateway: GatewaySettings,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Base URL of the crosscast-gateway service.
    pub url: String,

    /// Per-request timeout applied by the HTTP client.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Platforms enabled when no explicit selection is given.
    pub platforms: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            platforms: Platform::ALL.iter().map(|p| p.name().to_string()).collect(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when no config
    /// file exists yet. Parse errors still surface.
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Ok(Self::default_config())
        }
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            gateway: GatewaySettings {
                url: "http://127.0.0.1:8787".to_string(),
                timeout_secs: default_timeout_secs(),
            },
            defaults: DefaultsConfig::default(),
        }
    }

    /// The configured default platforms, parsed and validated.
    pub fn default_platforms(&self) -> Result<Vec<Platform>> {
        self.defaults
            .platforms
            .iter()
            .map(|name| name.parse::<Platform>())
            .collect()
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CROSSCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("crosscast").join("config.toml"))
}
