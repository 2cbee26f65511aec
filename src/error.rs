//! Error types for llm-inside.

use thiserror::Error;

/// Result type alias for llm-inside operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for llm-inside.
#[derive(Error, Debug)]
pub enum Error {
    /// No API key found in any of the configured environment variables.
    #[error("missing API credential (checked: {vars})")]
    MissingCredential { vars: String },

    /// Transport-level failure talking to the explanation service.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The explanation service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The explanation service answered without any text.
    #[error("service returned an empty response")]
    EmptyResponse,

    /// Stage name did not match any pipeline stage.
    #[error("unknown stage: {0}")]
    UnknownStage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
