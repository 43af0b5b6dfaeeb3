//! Configuration types for Chatkeep.
//!
//! `ChatkeepConfig` represents the `config.toml` in the data directory.
//! Every field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the store and its HTTP boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatkeepConfig {
    /// Lifetime of a login session in days.
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: u32,

    /// Page size used when a listing request gives no `limit`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound applied to any requested `limit`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_session_ttl_days() -> u32 {
    7
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for ChatkeepConfig {
    fn default() -> Self {
        Self {
            session_ttl_days: default_session_ttl_days(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9899
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
    /// Bridge spans to OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}
