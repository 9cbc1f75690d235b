mod channels;
mod defaults;

#[cfg(test)]
mod tests;

pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::MbotError;
use crate::executor::ExecutorLimits;
use defaults::*;

/// Top-level mbot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mbot: MbotConfig,
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MbotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MbotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Conversation state store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Webhook HTTP server config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

/// Ledger behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Run read-execute-write for one conversation under a lock, so two
    /// messages arriving together cannot overwrite each other's update.
    #[serde(default = "default_true")]
    pub serialize_conversations: bool,
    #[serde(default = "default_max_roster_size")]
    pub max_roster_size: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            serialize_conversations: true,
            max_roster_size: default_max_roster_size(),
        }
    }
}

impl LedgerConfig {
    pub fn limits(&self) -> ExecutorLimits {
        ExecutorLimits {
            max_roster_size: self.max_roster_size,
        }
    }
}

impl Config {
    /// Apply `CHANNEL_ACCESS_TOKEN`, `CHANNEL_SECRET`, and `PORT` from the environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), MbotError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), MbotError> {
        if let Some(token) = lookup("CHANNEL_ACCESS_TOKEN").filter(|v| !v.is_empty()) {
            self.line.channel_access_token = token;
        }
        if let Some(secret) = lookup("CHANNEL_SECRET").filter(|v| !v.is_empty()) {
            self.line.channel_secret = secret;
        }
        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            self.api.port = port
                .parse()
                .map_err(|e| MbotError::Config(format!("invalid PORT '{port}': {e}")))?;
        }
        Ok(())
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, MbotError> {
    let path = Path::new(path);
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| MbotError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| MbotError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
