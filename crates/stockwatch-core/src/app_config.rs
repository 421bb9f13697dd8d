use std::path::PathBuf;

use crate::ConfigError;

/// Process-level settings read from the environment at startup.
///
/// Per-target settings live in the monitors file (see [`crate::monitors`]);
/// this struct only carries what applies to every monitor.
#[derive(Clone)]
pub struct AppConfig {
    /// Monitors file from `CONFIG_FILE`; the binary's `--config` flag wins.
    pub monitors_path: Option<PathBuf>,
    /// When `false`, in-stock verdicts go to the local sink instead of chat.
    pub post_to_discord: bool,
    pub discord_token: Option<String>,
    pub discord_api_base: String,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub artifact_path: Option<PathBuf>,
}

impl AppConfig {
    /// Picks the monitors file path, preferring an explicit override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] for `CONFIG_FILE` when neither
    /// the override nor the environment supplies a path.
    pub fn resolve_monitors_path(
        &self,
        override_path: Option<PathBuf>,
    ) -> Result<PathBuf, ConfigError> {
        override_path
            .or_else(|| self.monitors_path.clone())
            .ok_or_else(|| ConfigError::MissingEnvVar("CONFIG_FILE".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("monitors_path", &self.monitors_path)
            .field("post_to_discord", &self.post_to_discord)
            .field(
                "discord_token",
                &self.discord_token.as_ref().map(|_| "[redacted]"),
            )
            .field("discord_api_base", &self.discord_api_base)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("artifact_path", &self.artifact_path)
            .finish()
    }
}
