//! Persistence contracts used by the orchestrator.

use briefing_models::{AgentResultRecord, Run, RunId};

use crate::error::Result;

/// Store for run records.
pub trait RunRepository: Send + Sync {
    /// Inserts a new run. Fails if the id is already taken.
    fn create_run(&self, run: &Run) -> Result<()>;

    /// Replaces an existing run. Fails if the run does not exist.
    fn update_run(&self, run: &Run) -> Result<()>;

    /// Loads a run by id.
    fn load_run(&self, id: &RunId) -> Result<Run>;

    /// Lists all runs, newest first.
    fn list_runs(&self) -> Result<Vec<Run>>;
}

/// Append-only store for per-agent results.
pub trait AgentResultRepository: Send + Sync {
    /// Appends one result.
    fn append_result(&self, record: &AgentResultRecord) -> Result<()>;

    /// Lists the results of a run in the order they were recorded.
    fn list_results(&self, run_id: &RunId) -> Result<Vec<AgentResultRecord>>;
}
