//! Agent context and results.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{ResultId, RunId};
use crate::location::Location;
use crate::payload::AgentPayload;

/// Shared, immutable input handed to every agent in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContext {
    pub location_id: String,
    pub location_slug: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
}

impl AgentContext {
    /// Builds the context for the seven-day week starting at `week_start`.
    pub fn for_week(location: &Location, week_start: NaiveDate) -> Self {
        Self {
            location_id: location.id.clone(),
            location_slug: location.slug.clone(),
            week_start,
            week_end: week_start + Duration::days(6),
        }
    }
}

/// Outcome of a single agent invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Completed,
    Failed,
    Skipped,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentStatus::Completed => "completed",
            AgentStatus::Failed => "failed",
            AgentStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Uniform result shape for every agent.
///
/// Construct through [`AgentRunResult::completed`], [`AgentRunResult::failed`]
/// or [`AgentRunResult::skipped`]; a failed result always carries zero
/// confidence and a non-empty summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRunResult {
    pub agent_name: String,
    pub status: AgentStatus,
    pub duration_ms: u64,
    /// Self-reported reliability, 0-100. Display only.
    pub confidence: u8,
    pub result_summary: String,
    #[serde(default)]
    pub data: AgentPayload,
}

impl AgentRunResult {
    /// A successful result. Confidence is clamped to 100.
    pub fn completed(
        agent_name: impl Into<String>,
        duration_ms: u64,
        confidence: u8,
        result_summary: impl Into<String>,
        data: AgentPayload,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: AgentStatus::Completed,
            duration_ms,
            confidence: confidence.min(100),
            result_summary: result_summary.into(),
            data,
        }
    }

    /// A failed result carrying the error text as its summary.
    pub fn failed(agent_name: impl Into<String>, duration_ms: u64, error: impl Into<String>) -> Self {
        let agent_name = agent_name.into();
        let mut summary = error.into();
        if summary.trim().is_empty() {
            summary = format!("{} failed", agent_name);
        }
        Self {
            agent_name,
            status: AgentStatus::Failed,
            duration_ms,
            confidence: 0,
            result_summary: summary,
            data: AgentPayload::Empty,
        }
    }

    /// A result for an agent that had nothing to work with.
    pub fn skipped(agent_name: impl Into<String>, duration_ms: u64, reason: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: AgentStatus::Skipped,
            duration_ms,
            confidence: 0,
            result_summary: reason.into(),
            data: AgentPayload::Empty,
        }
    }

    /// Returns true if the agent completed.
    pub fn is_completed(&self) -> bool {
        self.status == AgentStatus::Completed
    }
}

/// A persisted agent result, bound to one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResultRecord {
    pub id: ResultId,
    pub run_id: RunId,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: AgentRunResult,
}

impl AgentResultRecord {
    /// Wraps a result for persistence under the given run.
    pub fn new(run_id: RunId, result: AgentRunResult) -> Self {
        Self {
            id: ResultId::new(),
            run_id,
            recorded_at: Utc::now(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_spans_seven_days() {
        let location = Location::new("loc-1", "harbour-st", "Harbour St");
        let start = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let ctx = AgentContext::for_week(&location, start);
        assert_eq!(ctx.week_end, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(ctx.location_slug, "harbour-st");
    }

    #[test]
    fn test_failed_result_has_zero_confidence() {
        let result = AgentRunResult::failed("waste_risk", 12, "feed unavailable");
        assert_eq!(result.status, AgentStatus::Failed);
        assert_eq!(result.confidence, 0);
        assert_eq!(result.result_summary, "feed unavailable");
        assert!(result.data.is_empty());
    }

    #[test]
    fn test_failed_result_never_has_empty_summary() {
        let result = AgentRunResult::failed("waste_risk", 0, "  ");
        assert_eq!(result.result_summary, "waste_risk failed");
    }

    #[test]
    fn test_completed_confidence_clamped() {
        let result = AgentRunResult::completed("demand_forecast", 5, 250, "ok", AgentPayload::Empty);
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn test_record_flattens_result() {
        let record = AgentResultRecord::new(
            RunId::from_string("run-1"),
            AgentRunResult::skipped("rotation_fill", 1, "no forecast"),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["run_id"], "run-1");
        assert_eq!(json["agent_name"], "rotation_fill");
        assert_eq!(json["status"], "skipped");
    }
}
