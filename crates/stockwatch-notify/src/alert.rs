use chrono::{DateTime, Utc};
use serde::Serialize;
use stockwatch_core::{Destination, MonitorSpec, StockVerdict};

/// Structured in-stock alert: the fields every sink renders in its own way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    pub url: String,
    pub price: String,
    pub sku: String,
    pub item_type: String,
    pub observed_at: DateTime<Utc>,
}

impl Alert {
    /// Builds the alert for `spec`, filling absent metadata with placeholders.
    #[must_use]
    pub fn new(spec: &MonitorSpec, verdict: &StockVerdict) -> Self {
        Self {
            title: spec.friendly_name.clone(),
            url: spec.url.clone(),
            price: verdict.price_or_default().to_string(),
            sku: verdict.sku_or_default().to_string(),
            item_type: verdict.item_type_or_default().to_string(),
            observed_at: verdict.observed_at,
        }
    }
}

/// A message created at startup that should be removed again on shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub destination: Destination,
    pub message_id: String,
}

/// Text of the startup "now watching" message.
#[must_use]
pub fn watching_message(spec: &MonitorSpec) -> String {
    format!(
        "Checking [{name}]({url}) stock every {secs} seconds",
        name = spec.friendly_name,
        url = spec.url,
        secs = spec.interval_secs,
    )
}
