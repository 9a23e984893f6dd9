//! The assembled weekly briefing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{ActionItem, Priority};
use crate::agent::{AgentRunResult, AgentStatus};
use crate::ids::RunId;
use crate::phase::PhaseId;

/// Results of one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub phase: PhaseId,
    pub agents: Vec<AgentRunResult>,
    pub duration_ms: u64,
}

/// Full structured result of a briefing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Briefing {
    pub run_id: RunId,
    pub location_id: String,
    pub location_slug: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub phases: Vec<PhaseReport>,
    pub actions: Vec<ActionItem>,
    pub summary: String,
    pub has_ai_summary: bool,
    pub generated_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl Briefing {
    /// Iterates over every agent result across all phases.
    pub fn agent_results(&self) -> impl Iterator<Item = &AgentRunResult> {
        self.phases.iter().flat_map(|p| p.agents.iter())
    }

    /// Finds an agent result by agent name.
    pub fn agent(&self, name: &str) -> Option<&AgentRunResult> {
        self.agent_results().find(|r| r.agent_name == name)
    }

    /// Counts agent results with the given status.
    pub fn count_status(&self, status: AgentStatus) -> usize {
        self.agent_results().filter(|r| r.status == status).count()
    }

    /// Counts action items with the given priority.
    pub fn count_priority(&self, priority: Priority) -> usize {
        self.actions.iter().filter(|a| a.priority == priority).count()
    }
}
