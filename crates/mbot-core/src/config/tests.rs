use super::*;
use std::collections::HashMap;

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.mbot.name, "mbot");
    assert_eq!(cfg.mbot.log_level, "info");
    assert_eq!(cfg.api.port, 3000);
    assert_eq!(cfg.line.api_base_url, "https://api.line.me");
    assert!(cfg.line.enabled);
    assert!(cfg.ledger.serialize_conversations);
    assert_eq!(cfg.ledger.max_roster_size, 10_000);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let toml_str = r#"
        [line]
        channel_access_token = "tok"

        [ledger]
        serialize_conversations = false
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.line.channel_access_token, "tok");
    assert!(cfg.line.enabled);
    assert!(!cfg.ledger.serialize_conversations);
    assert_eq!(cfg.ledger.max_roster_size, 10_000);
    assert_eq!(cfg.memory.db_path, "~/.mbot/data/mbot.db");
}

#[test]
fn test_limits_from_ledger_config() {
    let ledger = LedgerConfig {
        serialize_conversations: true,
        max_roster_size: 50,
    };
    assert_eq!(ledger.limits().max_roster_size, 50);
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/__mbot__/config.toml").unwrap();
    assert_eq!(cfg.api.port, 3000);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nport = 8080\n\n[mbot]\nlog_level = \"debug\"\n").unwrap();

    let cfg = load(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.api.port, 8080);
    assert_eq!(cfg.mbot.log_level, "debug");
}

#[test]
fn test_load_invalid_toml_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api\nport = ").unwrap();

    let err = load(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, MbotError::Config(_)));
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("CHANNEL_ACCESS_TOKEN", "env-token"),
        ("CHANNEL_SECRET", "env-secret"),
        ("PORT", "9000"),
    ]);
    let mut cfg = Config::default();
    cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()))
        .unwrap();
    assert_eq!(cfg.line.channel_access_token, "env-token");
    assert_eq!(cfg.line.channel_secret, "env-secret");
    assert_eq!(cfg.api.port, 9000);
}

#[test]
fn test_env_overrides_ignore_empty_values() {
    let mut cfg = Config::default();
    cfg.line.channel_secret = "from-file".to_string();
    cfg.apply_overrides(|k| (k == "CHANNEL_SECRET").then(String::new))
        .unwrap();
    assert_eq!(cfg.line.channel_secret, "from-file");
}

#[test]
fn test_env_override_bad_port() {
    let mut cfg = Config::default();
    let err = cfg
        .apply_overrides(|k| (k == "PORT").then(|| "http".to_string()))
        .unwrap_err();
    assert!(matches!(err, MbotError::Config(_)));
}

#[test]
fn test_shellexpand_leaves_absolute_paths() {
    assert_eq!(shellexpand("/var/lib/mbot.db"), "/var/lib/mbot.db");
}
