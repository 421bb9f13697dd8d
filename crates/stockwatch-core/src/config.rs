use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Desktop-browser User-Agent sent with every page fetch unless overridden.
/// Some storefronts serve a stripped page (or a block page) to obvious bots.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:84.0) Gecko/20100101 Firefox/84.0";

const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` instead of mutating process state.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let monitors_path = optional_path("CONFIG_FILE");
    let post_to_discord = parse_bool("POST_TO_DISCORD", &or_default("POST_TO_DISCORD", "false"))?;

    let discord_token = lookup("STOCKWATCH_DISCORD_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    if post_to_discord && discord_token.is_none() {
        return Err(ConfigError::MissingEnvVar(
            "STOCKWATCH_DISCORD_TOKEN".to_string(),
        ));
    }

    let discord_api_base = or_default("STOCKWATCH_DISCORD_API_BASE", DEFAULT_DISCORD_API_BASE)
        .trim_end_matches('/')
        .to_string();
    let log_level = or_default("STOCKWATCH_LOG_LEVEL", "info");
    let log_file = optional_path("STOCKWATCH_LOG_FILE");
    let request_timeout_secs = parse_positive_u64("STOCKWATCH_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("STOCKWATCH_USER_AGENT", DEFAULT_USER_AGENT);
    let artifact_path = optional_path("STOCKWATCH_ARTIFACT_PATH");

    Ok(AppConfig {
        monitors_path,
        post_to_discord,
        discord_token,
        discord_api_base,
        log_level,
        log_file,
        request_timeout_secs,
        user_agent,
        artifact_path,
    })
}

/// Parse a boolean flag, accepting the usual spellings (`1`, `t`, `true`,
/// `0`, `f`, `false`, in any case).
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
