//! Error types for agents.

use std::path::PathBuf;
use thiserror::Error;

/// Errors an agent can report instead of a result.
#[derive(Error, Debug)]
pub enum AgentError {
    /// No exported feed for this agent, location and week.
    #[error("feed not found: {0}")]
    FeedMissing(PathBuf),

    /// Feed exists but could not be read.
    #[error("failed to read feed {path}: {source}")]
    FeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Feed content is malformed or of the wrong kind.
    #[error("invalid feed {path}: {message}")]
    InvalidFeed { path: PathBuf, message: String },

    /// The analysis itself failed.
    #[error("analysis failed: {0}")]
    Analysis(String),
}

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::FeedMissing(PathBuf::from("/feeds/waste_risk.json"));
        assert_eq!(err.to_string(), "feed not found: /feeds/waste_risk.json");

        let err = AgentError::Analysis("no sales history".into());
        assert_eq!(err.to_string(), "analysis failed: no sales history");
    }
}
