//! Error types for the orchestrator.

use briefing_models::{RunId, RunStatus, RunTransitionError};
use briefing_persistence::PersistenceError;
use thiserror::Error;

/// Pipeline-fatal errors.
///
/// Agent and narrative failures never surface here; they are recorded in
/// the briefing instead.
#[derive(Debug, Error)]
pub enum BriefingError {
    /// Persistence error.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Illegal run status transition.
    #[error(transparent)]
    RunTransition(#[from] RunTransitionError),

    /// No location with the requested slug.
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// No run with the requested id.
    #[error("Run not found: {0}")]
    RunNotFound(RunId),

    /// The requested run already reached a terminal status.
    #[error("Run {0} already finished ({1})")]
    RunAlreadyFinished(RunId, RunStatus),

    /// The caller cancelled the run.
    #[error("Briefing cancelled")]
    Cancelled,

    /// Briefing snapshot could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, BriefingError>;
