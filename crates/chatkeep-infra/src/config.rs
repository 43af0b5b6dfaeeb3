//! Configuration and data directory resolution.
//!
//! The data directory holds `config.toml` and `chatkeep.db`. Configuration
//! falls back to defaults when the file is missing or malformed, so a fresh
//! install starts without any setup.

use std::path::{Path, PathBuf};

use chatkeep_types::config::ChatkeepConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CHATKEEP_DATA_DIR";

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory.
///
/// Priority:
/// 1. `CHATKEEP_DATA_DIR` environment variable
/// 2. `~/.chatkeep`
/// 3. `.chatkeep` relative to the working directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatkeep");
    }

    PathBuf::from(".chatkeep")
}

/// Load configuration from `{data_dir}/config.toml`.
pub async fn load_config(data_dir: &Path) -> ChatkeepConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ChatkeepConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ChatkeepConfig::default();
        }
    };

    match toml::from_str::<ChatkeepConfig>(&content) {
        Ok(config) => sanitize(config),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ChatkeepConfig::default()
        }
    }
}

/// Clamp values that would make the store unusable.
fn sanitize(mut config: ChatkeepConfig) -> ChatkeepConfig {
    if config.session_ttl_days == 0 {
        tracing::warn!("session_ttl_days = 0 would expire every session, using 1");
        config.session_ttl_days = 1;
    }
    config.max_page_size = config.max_page_size.max(1);
    config.default_page_size = config.default_page_size.clamp(1, config.max_page_size);
    config
}
