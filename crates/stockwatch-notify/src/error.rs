use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat API returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("monitor '{0}' has no destination configured")]
    MissingDestination(String),

    #[error("failed to write alert artifact {path}: {source}")]
    Artifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode alert: {0}")]
    Encode(#[from] serde_json::Error),
}
