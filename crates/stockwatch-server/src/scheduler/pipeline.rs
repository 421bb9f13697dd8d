//! One stock check: fetch, detect, dispatch.

use std::sync::Arc;
use std::time::Duration;

use stockwatch_core::{MonitorSpec, StockVerdict};
use stockwatch_notify::Notifier;
use stockwatch_scraper::{FetchError, PageSource, StockDetector};

/// Where in-stock verdicts go.
///
/// With posting enabled they reach the chat notifier; otherwise they are
/// kept local (artifact file or log).
pub struct Dispatch {
    remote: Option<Arc<dyn Notifier>>,
    local: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("posting_enabled", &self.posting_enabled())
            .finish_non_exhaustive()
    }
}

impl Dispatch {
    #[must_use]
    pub fn posting(remote: Arc<dyn Notifier>, local: Arc<dyn Notifier>) -> Self {
        Self {
            remote: Some(remote),
            local,
        }
    }

    #[must_use]
    pub fn local_only(local: Arc<dyn Notifier>) -> Self {
        Self {
            remote: None,
            local,
        }
    }

    #[must_use]
    pub fn posting_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// The chat notifier, when posting is enabled.
    #[must_use]
    pub fn remote(&self) -> Option<&Arc<dyn Notifier>> {
        self.remote.as_ref()
    }

    fn target(&self) -> &Arc<dyn Notifier> {
        match &self.remote {
            Some(remote) => remote,
            None => &self.local,
        }
    }
}

/// Everything a monitor task needs besides its own spec. Shared read-only
/// across all tasks.
pub struct Pipeline {
    pub source: Arc<dyn PageSource>,
    pub dispatch: Dispatch,
    pub fetch_timeout: Duration,
}

/// What a single tick concluded. Only used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    InStock { notified: bool },
    OutOfStock,
    FetchFailed,
    DetectFailed,
}

impl Pipeline {
    /// Runs one check for `spec`. Never fails: every error is logged and
    /// reported through the returned outcome.
    pub async fn run_tick(&self, spec: &MonitorSpec) -> TickOutcome {
        let markup = match self.fetch(&spec.url).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!(
                    monitor = %spec.friendly_name,
                    url = %spec.url,
                    timeout = e.is_timeout(),
                    error = %e,
                    "fetch failed; skipping this check"
                );
                return TickOutcome::FetchFailed;
            }
        };

        let verdict = match spec.rule.detect(&markup) {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(
                    monitor = %spec.friendly_name,
                    rule = spec.rule.kind(),
                    error = %e,
                    "could not evaluate page; verdict withheld"
                );
                return TickOutcome::DetectFailed;
            }
        };

        if !verdict.in_stock {
            tracing::info!(monitor = %spec.friendly_name, "out of stock");
            return TickOutcome::OutOfStock;
        }

        tracing::info!(
            monitor = %spec.friendly_name,
            price = %verdict.price_or_default(),
            sku = %verdict.sku_or_default(),
            "IN STOCK"
        );
        let notified = self.dispatch_verdict(spec, &verdict).await;
        TickOutcome::InStock { notified }
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_owned(),
                timeout_ms: self.fetch_timeout.as_millis(),
            }),
        }
    }

    async fn dispatch_verdict(&self, spec: &MonitorSpec, verdict: &StockVerdict) -> bool {
        let notifier = self.dispatch.target();
        match notifier.notify(&spec.destination, verdict, spec).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    monitor = %spec.friendly_name,
                    destination = %spec.destination,
                    error = %e,
                    "failed to deliver in-stock alert"
                );
                false
            }
        }
    }
}
