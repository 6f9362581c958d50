//! Server Configuration
//!
//! Layers a TOML file with FORMCAST_* environment overrides.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// One configured prediction app
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// URL-safe app identifier
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// Path to the schema artifact
    pub schema: PathBuf,
    /// Path to the model artifact
    pub model: PathBuf,
}

/// Rate limiting knobs for the predict route
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Replenishment interval in seconds
    pub per_second: u64,
    /// Requests that may be made immediately
    pub burst_size: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst_size: 5,
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Rate limiting settings
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    /// Apps to load at startup
    #[serde(default)]
    pub apps: Vec<AppConfig>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl ServerConfig {
    /// Load configuration from an explicit file, or `config/default` plus
    /// environment overrides when no path is given
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let builder = match path {
            Some(p) => Config::builder().add_source(File::with_name(p)),
            None => Config::builder().add_source(File::with_name("config/default").required(false)),
        };

        builder
            .add_source(Environment::with_prefix("FORMCAST").separator("__"))
            .build()?
            .try_deserialize()
    }
}
