//! Monitor definitions and the monitors file loader.
//!
//! The file is decoded into loose `Raw*` shapes first and then resolved into
//! [`MonitorSpec`] values whose [`DetectionRule`] is fixed for the lifetime of
//! the process. Selectors are compiled here, so a typo in a selector is a
//! startup error instead of a failure on every tick.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::ConfigError;

/// Button text that counts as "in stock" regardless of the configured
/// positive text, unless a monitor overrides it.
pub const DEFAULT_ALWAYS_IN_STOCK_TEXT: &str = "See Details";

/// Longest accepted polling interval (30 days).
pub const MAX_INTERVAL_SECS: u64 = 30 * 24 * 60 * 60;

/// Opaque notification target, e.g. a chat channel id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination(String);

impl Destination {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A CSS selector compiled once at load time, keeping its source text for logs.
#[derive(Debug, Clone)]
pub struct CssSelector {
    source: String,
    compiled: scraper::Selector,
}

impl CssSelector {
    /// Compiles `source` into a selector.
    ///
    /// # Errors
    ///
    /// Returns the selector engine's message when `source` is not a valid selector.
    pub fn parse(source: &str) -> Result<Self, String> {
        let compiled = scraper::Selector::parse(source).map_err(|e| e.to_string())?;
        Ok(Self {
            source: source.to_string(),
            compiled,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn selector(&self) -> &scraper::Selector {
        &self.compiled
    }
}

/// Out of stock when the raw page contains `out_of_stock_keyword`.
#[derive(Debug, Clone)]
pub struct SubstringRule {
    pub out_of_stock_keyword: String,
}

/// In stock when any element matched by `selector` reads `positive` (or the
/// `always_in_stock_text` fallback).
#[derive(Debug, Clone)]
pub struct SelectorRule {
    pub selector: CssSelector,
    pub positive: String,
    /// Carried through from the file but not consulted when matching.
    pub negative: String,
    pub always_in_stock_text: Option<String>,
    pub price_selector: Option<CssSelector>,
    pub sku_selector: Option<CssSelector>,
    pub type_selector: Option<CssSelector>,
}

#[derive(Debug, Clone)]
pub enum DetectionRule {
    Substring(SubstringRule),
    Selector(SelectorRule),
}

impl DetectionRule {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DetectionRule::Substring(_) => "substring",
            DetectionRule::Selector(_) => "selector",
        }
    }
}

/// One watched product page.
#[derive(Debug, Clone)]
pub struct MonitorSpec {
    pub url: String,
    pub friendly_name: String,
    pub interval_secs: u64,
    pub enabled: bool,
    pub destination: Destination,
    pub rule: DetectionRule,
}

impl MonitorSpec {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Serialization format of a monitors file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorsFormat {
    Json,
    Yaml,
}

impl MonitorsFormat {
    /// `.yaml` / `.yml` select YAML; everything else is read as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => MonitorsFormat::Yaml,
            _ => MonitorsFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MonitorsDocument {
    Wrapped { monitors: Vec<RawMonitor> },
    Bare(Vec<RawMonitor>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMonitor {
    url: String,
    friendly_name: String,
    interval: u64,
    #[serde(default)]
    enabled: bool,
    #[serde(rename = "channelID", default)]
    channel_id: String,
    #[serde(default)]
    out_of_stock_keyword: Option<String>,
    #[serde(default)]
    keywords: Option<RawKeywords>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawKeywords {
    #[serde(default)]
    positive: String,
    #[serde(default)]
    negative: String,
    selector: String,
    #[serde(default)]
    sku_selector: Option<String>,
    #[serde(default)]
    price_selector: Option<String>,
    #[serde(default)]
    type_selector: Option<String>,
    #[serde(default = "default_always_in_stock_text")]
    always_in_stock_text: Option<String>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_always_in_stock_text() -> Option<String> {
    Some(DEFAULT_ALWAYS_IN_STOCK_TEXT.to_string())
}

/// Load and validate every monitor from the file at `path`.
///
/// Disabled monitors are returned too; callers decide what to schedule.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or if any
/// monitor fails validation.
pub fn load_monitors(path: &Path) -> Result<Vec<MonitorSpec>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MonitorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    decode_monitors(
        &content,
        MonitorsFormat::from_path(path),
        &path.display().to_string(),
    )
}

/// Parse monitors from an in-memory document.
///
/// # Errors
///
/// Returns `ConfigError` if the document is malformed or any monitor fails
/// validation.
pub fn parse_monitors(
    content: &str,
    format: MonitorsFormat,
) -> Result<Vec<MonitorSpec>, ConfigError> {
    decode_monitors(content, format, "<inline>")
}

fn decode_monitors(
    content: &str,
    format: MonitorsFormat,
    label: &str,
) -> Result<Vec<MonitorSpec>, ConfigError> {
    let parse_err = |reason: String| ConfigError::MonitorsFileParse {
        path: label.to_string(),
        reason,
    };

    let document: MonitorsDocument = match format {
        MonitorsFormat::Json => {
            serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?
        }
        MonitorsFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?
        }
    };

    let raw = match document {
        MonitorsDocument::Wrapped { monitors } | MonitorsDocument::Bare(monitors) => monitors,
    };

    raw.into_iter()
        .enumerate()
        .map(|(index, monitor)| resolve_monitor(index, monitor))
        .collect()
}

fn resolve_monitor(index: usize, raw: RawMonitor) -> Result<MonitorSpec, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidMonitor {
        index,
        name: raw.friendly_name.clone(),
        reason,
    };

    if raw.friendly_name.trim().is_empty() {
        return Err(invalid("friendlyName must be non-empty".to_string()));
    }
    validate_url(&raw.url).map_err(&invalid)?;
    if raw.interval == 0 {
        return Err(invalid("interval must be greater than zero".to_string()));
    }
    if raw.interval > MAX_INTERVAL_SECS {
        return Err(invalid(format!(
            "interval {} exceeds the maximum of {MAX_INTERVAL_SECS} seconds",
            raw.interval
        )));
    }

    let rule = match (raw.out_of_stock_keyword.as_deref(), raw.keywords.as_ref()) {
        (Some(_), Some(_)) => {
            return Err(invalid(
                "set either outOfStockKeyword or keywords, not both".to_string(),
            ));
        }
        (None, None) => {
            return Err(invalid(
                "a detection rule is required: outOfStockKeyword or keywords".to_string(),
            ));
        }
        (Some(keyword), None) => {
            if keyword.is_empty() {
                return Err(invalid("outOfStockKeyword must be non-empty".to_string()));
            }
            DetectionRule::Substring(SubstringRule {
                out_of_stock_keyword: keyword.to_string(),
            })
        }
        (None, Some(keywords)) => {
            DetectionRule::Selector(resolve_keywords(keywords).map_err(&invalid)?)
        }
    };

    Ok(MonitorSpec {
        url: raw.url.clone(),
        friendly_name: raw.friendly_name.clone(),
        interval_secs: raw.interval,
        enabled: raw.enabled,
        destination: Destination::new(raw.channel_id.clone()),
        rule,
    })
}

fn resolve_keywords(keywords: &RawKeywords) -> Result<SelectorRule, String> {
    if keywords.selector.trim().is_empty() {
        return Err("keywords.selector must be non-empty".to_string());
    }

    let compile = |field: &str, source: &str| {
        CssSelector::parse(source).map_err(|e| format!("invalid {field} \"{source}\": {e}"))
    };

    // Empty strings mean "not configured", matching how older files were written.
    let optional = |field: &str, source: Option<&String>| -> Result<Option<CssSelector>, String> {
        match source.map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(s) => compile(field, s).map(Some),
            None => Ok(None),
        }
    };

    Ok(SelectorRule {
        selector: compile("selector", keywords.selector.trim())?,
        positive: keywords.positive.clone(),
        negative: keywords.negative.clone(),
        always_in_stock_text: keywords
            .always_in_stock_text
            .clone()
            .filter(|t| !t.is_empty()),
        price_selector: optional("priceSelector", keywords.price_selector.as_ref())?,
        sku_selector: optional("skuSelector", keywords.sku_selector.as_ref())?,
        type_selector: optional("typeSelector", keywords.type_selector.as_ref())?,
    })
}

/// Accept only absolute `http`/`https` URLs with a host.
fn validate_url(url: &str) -> Result<(), String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err("url must be non-empty".to_string());
    }
    let parsed =
        reqwest::Url::parse(trimmed).map_err(|e| format!("invalid url \"{trimmed}\": {e}"))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "url must use http or https scheme, got '{scheme}' in \"{trimmed}\""
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("url \"{trimmed}\" has no host"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "monitors_test.rs"]
mod tests;
