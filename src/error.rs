//! Error types for satsplit.

use thiserror::Error;

/// Main error type for satsplit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Tokenizer error
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] tokenizers::Error),

    /// HTTP transport error
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Scoring backend returned a failure or a malformed response
    #[error("Backend error: {0}")]
    Backend(String),

    /// Server or model is not ready to serve requests
    #[error("Backend not ready: {0}")]
    NotReady(String),

    /// Score tensor arrived in a datatype the pipeline cannot decode
    #[error("Unsupported score datatype: {0}")]
    UnsupportedDatatype(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Hub download error
    #[error("Hub download error: {0}")]
    HubDownload(String),
}

/// Result type alias for satsplit operations.
pub type Result<T> = std::result::Result<T, Error>;
