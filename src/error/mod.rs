// Error types for the agent2gemini adapter

use thiserror::Error;

/// Errors surfaced by the adapter.
///
/// Translation errors (`UnsupportedRole`, `InvalidRole`) are raised
/// synchronously, before any network call is made. Backend and stream
/// errors propagate to the caller unretried; retry policy lives with the
/// caller, not here.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported message role: {0}")]
    UnsupportedRole(String),

    #[error("Invalid backend role: {0}")]
    InvalidRole(String),

    #[error("Gemini API error: {0}")]
    Api(String),

    #[error("Stream processing error: {0}")]
    StreamProcessing(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
