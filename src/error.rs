use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("device returned HTTP {status} for {path}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid device timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("metric registration error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("exposition encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
