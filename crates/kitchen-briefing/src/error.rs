//! Error types for the CLI.

use thiserror::Error;

/// Errors surfaced to the user.
#[derive(Debug, Error)]
pub enum CliError {
    /// Briefing error.
    #[error(transparent)]
    Briefing(#[from] briefing_orchestrator::BriefingError),

    /// Narrative setup error.
    #[error("Narrative error: {0}")]
    Narrative(#[from] briefing_narrative::NarrativeError),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
