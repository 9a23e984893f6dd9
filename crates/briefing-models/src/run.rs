//! Briefing run records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ids::RunId;
use crate::location::Location;

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    /// Returns true for completed and failed runs.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Attempted to move a run that already reached a terminal status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("run {run_id} is already {status}")]
pub struct RunTransitionError {
    pub run_id: RunId,
    pub status: RunStatus,
}

/// One end-to-end execution of the briefing pipeline.
///
/// A run starts as [`RunStatus::Running`] and moves to a terminal status
/// exactly once through [`Run::complete`] or [`Run::fail`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    pub location_id: String,
    pub location_slug: String,
    pub week_start: NaiveDate,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub has_ai_summary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Serialized [`crate::Briefing`] snapshot, set on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub briefing: Option<serde_json::Value>,
}

impl Run {
    /// Opens a new running record.
    pub fn start(location: &Location, week_start: NaiveDate, triggered_by: Option<String>) -> Self {
        Self {
            id: RunId::new(),
            location_id: location.id.clone(),
            location_slug: location.slug.clone(),
            week_start,
            status: RunStatus::Running,
            triggered_by,
            started_at: Utc::now(),
            finished_at: None,
            duration_ms: 0,
            summary: None,
            has_ai_summary: false,
            error: None,
            briefing: None,
        }
    }

    fn ensure_running(&self) -> Result<(), RunTransitionError> {
        if self.status.is_terminal() {
            return Err(RunTransitionError {
                run_id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }

    /// Marks the run completed with its summary and briefing snapshot.
    pub fn complete(
        &mut self,
        summary: String,
        has_ai_summary: bool,
        briefing: serde_json::Value,
        duration_ms: u64,
    ) -> Result<(), RunTransitionError> {
        self.ensure_running()?;
        self.status = RunStatus::Completed;
        self.summary = Some(summary);
        self.has_ai_summary = has_ai_summary;
        self.briefing = Some(briefing);
        self.duration_ms = duration_ms;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Marks the run failed with the error text.
    pub fn fail(&mut self, error: impl Into<String>, duration_ms: u64) -> Result<(), RunTransitionError> {
        self.ensure_running()?;
        self.status = RunStatus::Failed;
        self.error = Some(error.into());
        self.duration_ms = duration_ms;
        self.finished_at = Some(Utc::now());
        Ok(())
    }
}
