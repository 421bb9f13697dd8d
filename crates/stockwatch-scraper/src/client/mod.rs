//! HTTP client that downloads product pages for stock checks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::FetchError;

/// Upper bound on the TCP/TLS connect phase; the overall request timeout
/// still applies on top of it.
const MAX_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Anything that can turn a URL into page markup.
///
/// The scheduler holds one of these behind an `Arc<dyn PageSource>` so every
/// monitor task shares a single connection pool.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the request fails, times out, or answers
    /// with a non-2xx status.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Page fetcher with a fixed browser-like `User-Agent` and a per-request timeout.
///
/// A fetch is a single GET with no extra headers and no retries: the
/// monitor's own timer is the retry cadence.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
}

impl PageClient {
    /// Creates a `PageClient` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(timeout_secs), user_agent)
    }

    /// Like [`PageClient::new`] but with a sub-second capable timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_timeout(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let connect_timeout = timeout.min(Duration::from_secs(MAX_CONNECT_TIMEOUT_SECS));
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Downloads one page.
    ///
    /// # Errors
    ///
    /// - [`FetchError::UnexpectedStatus`] — any non-2xx status.
    /// - [`FetchError::Http`] — timeout, connection or TLS failure, or an
    ///   unreadable body.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageSource for PageClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_page(url).await
    }
}
