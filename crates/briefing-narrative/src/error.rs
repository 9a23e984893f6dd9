//! Error types for narrative synthesis.

use thiserror::Error;

/// Errors that can occur during narrative synthesis.
#[derive(Error, Debug)]
pub enum NarrativeError {
    /// API key not configured.
    #[error("OpenRouter API key not set")]
    NoApiKey,

    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Request failed or returned an error status.
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Response body was not what we expected.
    #[error("failed to parse response: {0}")]
    ParseError(String),
}

/// Result type for narrative operations.
pub type Result<T> = std::result::Result<T, NarrativeError>;
