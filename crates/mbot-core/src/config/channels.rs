use super::defaults::*;
use serde::{Deserialize, Serialize};

/// LINE Messaging API config.
///
/// Both secrets can also come from the `CHANNEL_ACCESS_TOKEN` and
/// `CHANNEL_SECRET` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub channel_access_token: String,
    /// Used to verify `x-line-signature`. Empty = signatures are not checked.
    #[serde(default)]
    pub channel_secret: String,
    #[serde(default = "default_line_api_base_url")]
    pub api_base_url: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel_access_token: String::new(),
            channel_secret: String::new(),
            api_base_url: default_line_api_base_url(),
        }
    }
}
