//! Live progress events for a briefing run.

use serde::{Deserialize, Serialize};

use crate::agent::AgentStatus;
use crate::ids::RunId;
use crate::phase::PhaseId;
use crate::run::RunStatus;

/// Progress event broadcast to observers of a run.
///
/// Events carry only what a progress view needs, never agent payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BriefingEvent {
    /// A phase is about to fan out.
    PhaseStart {
        phase: PhaseId,
        agents: Vec<String>,
    },
    /// An agent was launched.
    AgentStart { phase: PhaseId, agent: String },
    /// An agent settled.
    AgentComplete {
        phase: PhaseId,
        agent: String,
        status: AgentStatus,
        duration_ms: u64,
        confidence: u8,
        summary: String,
    },
    /// Every agent in the phase settled.
    PhaseComplete {
        phase: PhaseId,
        duration_ms: u64,
        completed: usize,
        failed: usize,
        skipped: usize,
    },
    /// The run reached a terminal state.
    BriefingComplete {
        run_id: RunId,
        status: RunStatus,
        action_count: usize,
        has_ai_summary: bool,
        duration_ms: u64,
    },
}

impl BriefingEvent {
    /// Returns true for the terminal event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BriefingEvent::BriefingComplete { .. })
    }

    /// Wire name of the event type.
    pub fn kind(&self) -> &'static str {
        match self {
            BriefingEvent::PhaseStart { .. } => "phase-start",
            BriefingEvent::AgentStart { .. } => "agent-start",
            BriefingEvent::AgentComplete { .. } => "agent-complete",
            BriefingEvent::PhaseComplete { .. } => "phase-complete",
            BriefingEvent::BriefingComplete { .. } => "briefing-complete",
        }
    }
}
