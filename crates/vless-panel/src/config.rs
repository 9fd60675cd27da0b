//! Configuration for the panel.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Panel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Xray daemon configuration
    #[serde(default)]
    pub xray: XrayConfig,

    /// Registry storage configuration
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XrayConfig {
    /// Path of the daemon configuration file (fully rewritten on every sync)
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Systemd unit name of the daemon
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Hostname advertised in connection URIs and subscriptions
    #[serde(default = "default_host")]
    pub host: String,

    /// Inbound listener port
    #[serde(default = "default_xray_port")]
    pub port: u16,

    /// Inbound protocol name
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Path to the registry snapshot file (only used when `persist` is set)
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, the registry is in-memory only and all
    /// users are lost on restart)
    #[serde(default)]
    pub persist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for XrayConfig {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            service_name: default_service_name(),
            host: default_host(),
            port: default_xray_port(),
            protocol: default_protocol(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
            persist: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_config_path() -> PathBuf {
    PathBuf::from("/etc/xray/config.json")
}

fn default_service_name() -> String {
    "xray".into()
}

fn default_host() -> String {
    "your.domain.com".into()
}

fn default_xray_port() -> u16 {
    443
}

fn default_protocol() -> String {
    "vless".into()
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("/var/lib/vless-panel/users.json")
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
