use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, timeout, TLS error, or a body that could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The caller's deadline expired before the page source answered.
    #[error("fetching {url} did not finish within {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u128 },
}

impl FetchError {
    /// `true` when the request was abandoned because it ran out of time.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Http(e) => e.is_timeout(),
            FetchError::Timeout { .. } => true,
            FetchError::UnexpectedStatus { .. } => false,
        }
    }
}

/// The page could not be evaluated, as opposed to "evaluated and out of stock".
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("page body is empty; nothing to evaluate")]
    EmptyDocument,
}
