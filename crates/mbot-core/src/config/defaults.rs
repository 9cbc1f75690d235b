//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "mbot".to_string()
}

pub fn default_data_dir() -> String {
    "~/.mbot".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_line_api_base_url() -> String {
    "https://api.line.me".to_string()
}

pub fn default_db_path() -> String {
    "~/.mbot/data/mbot.db".to_string()
}

pub fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_api_port() -> u16 {
    3000
}

pub fn default_max_roster_size() -> usize {
    crate::executor::DEFAULT_MAX_ROSTER_SIZE
}
