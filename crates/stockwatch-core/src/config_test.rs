use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with a monitors file set and posting disabled.
fn base_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("CONFIG_FILE", "./config/monitors.json");
    m
}

#[test]
fn build_app_config_applies_defaults() {
    let map = base_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.monitors_path,
        Some(PathBuf::from("./config/monitors.json"))
    );
    assert!(!cfg.post_to_discord);
    assert!(cfg.discord_token.is_none());
    assert_eq!(cfg.discord_api_base, "https://discord.com/api/v10");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.log_file.is_none());
    assert_eq!(cfg.request_timeout_secs, 15);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert!(cfg.artifact_path.is_none());
}

#[test]
fn build_app_config_without_config_file_leaves_path_unset() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.monitors_path.is_none());
    let err = cfg.resolve_monitors_path(None).unwrap_err();
    assert!(
        matches!(err, ConfigError::MissingEnvVar(ref v) if v == "CONFIG_FILE"),
        "expected MissingEnvVar(CONFIG_FILE), got: {err:?}"
    );
}

#[test]
fn resolve_monitors_path_prefers_override() {
    let map = base_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let path = cfg
        .resolve_monitors_path(Some(PathBuf::from("/etc/stockwatch/monitors.yaml")))
        .unwrap();
    assert_eq!(path, PathBuf::from("/etc/stockwatch/monitors.yaml"));
}

#[test]
fn post_to_discord_requires_token() {
    let mut map = base_env();
    map.insert("POST_TO_DISCORD", "true");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "STOCKWATCH_DISCORD_TOKEN"),
        "expected MissingEnvVar(STOCKWATCH_DISCORD_TOKEN), got: {result:?}"
    );
}

#[test]
fn post_to_discord_with_token_succeeds() {
    let mut map = base_env();
    map.insert("POST_TO_DISCORD", "T");
    map.insert("STOCKWATCH_DISCORD_TOKEN", "secret-token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.post_to_discord);
    assert_eq!(cfg.discord_token.as_deref(), Some("secret-token"));
}

#[test]
fn post_to_discord_rejects_garbage() {
    let mut map = base_env();
    map.insert("POST_TO_DISCORD", "yes please");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POST_TO_DISCORD"),
        "expected InvalidEnvVar(POST_TO_DISCORD), got: {result:?}"
    );
}

#[test]
fn parse_bool_accepts_common_spellings() {
    for raw in ["1", "t", "T", "true", "TRUE", "True"] {
        assert!(parse_bool("X", raw).unwrap(), "{raw} should be true");
    }
    for raw in ["0", "f", "F", "false", "FALSE", "False"] {
        assert!(!parse_bool("X", raw).unwrap(), "{raw} should be false");
    }
}

#[test]
fn request_timeout_override() {
    let mut map = base_env();
    map.insert("STOCKWATCH_REQUEST_TIMEOUT_SECS", "30");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 30);
}

#[test]
fn request_timeout_invalid() {
    let mut map = base_env();
    map.insert("STOCKWATCH_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOCKWATCH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(STOCKWATCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn request_timeout_zero_is_rejected() {
    let mut map = base_env();
    map.insert("STOCKWATCH_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOCKWATCH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(STOCKWATCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = base_env();
    map.insert("STOCKWATCH_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn discord_api_base_strips_trailing_slash() {
    let mut map = base_env();
    map.insert("STOCKWATCH_DISCORD_API_BASE", "http://127.0.0.1:9000/api/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.discord_api_base, "http://127.0.0.1:9000/api");
}

#[test]
fn blank_optional_paths_are_ignored() {
    let mut map = base_env();
    map.insert("STOCKWATCH_LOG_FILE", "  ");
    map.insert("STOCKWATCH_ARTIFACT_PATH", "in-stock.jsonl");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.log_file.is_none());
    assert_eq!(cfg.artifact_path, Some(PathBuf::from("in-stock.jsonl")));
}

#[test]
fn debug_redacts_token() {
    let mut map = base_env();
    map.insert("POST_TO_DISCORD", "1");
    map.insert("STOCKWATCH_DISCORD_TOKEN", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
