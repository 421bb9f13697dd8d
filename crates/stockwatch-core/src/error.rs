use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read monitors file {path}: {source}")]
    MonitorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse monitors file {path}: {reason}")]
    MonitorsFileParse { path: String, reason: String },

    #[error("invalid monitor #{index} ('{name}'): {reason}")]
    InvalidMonitor {
        index: usize,
        name: String,
        reason: String,
    },
}
