//! What the narrator sees of a run.

use briefing_models::{ActionItem, AgentContext, AgentStatus, PhaseId, PhaseReport};
use chrono::NaiveDate;
use serde::Serialize;

/// One agent outcome, without its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentLine {
    pub phase: PhaseId,
    pub agent: String,
    pub status: AgentStatus,
    pub summary: String,
}

/// Inputs to narrative synthesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeInput {
    pub location_slug: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub agents: Vec<AgentLine>,
    pub actions: Vec<ActionItem>,
    pub algorithmic_summary: String,
}

impl NarrativeInput {
    pub fn new(
        ctx: &AgentContext,
        phases: &[PhaseReport],
        actions: &[ActionItem],
        algorithmic_summary: impl Into<String>,
    ) -> Self {
        let agents = phases
            .iter()
            .flat_map(|p| {
                p.agents.iter().map(move |r| AgentLine {
                    phase: p.phase,
                    agent: r.agent_name.clone(),
                    status: r.status,
                    summary: r.result_summary.clone(),
                })
            })
            .collect();

        Self {
            location_slug: ctx.location_slug.clone(),
            week_start: ctx.week_start,
            week_end: ctx.week_end,
            agents,
            actions: actions.to_vec(),
            algorithmic_summary: algorithmic_summary.into(),
        }
    }

    /// Renders the user prompt sent to the model.
    pub fn to_prompt(&self) -> String {
        let mut prompt = format!(
            "Kitchen: {}\nWeek: {} to {}\n\nAgent results:\n",
            self.location_slug, self.week_start, self.week_end
        );
        for line in &self.agents {
            prompt.push_str(&format!(
                "- [phase {}] {} ({}): {}\n",
                line.phase, line.agent, line.status, line.summary
            ));
        }

        prompt.push_str("\nAction items:\n");
        if self.actions.is_empty() {
            prompt.push_str("- none\n");
        }
        for action in &self.actions {
            prompt.push_str(&format!(
                "- {} {}: {}\n",
                action.priority, action.title, action.detail
            ));
        }

        prompt.push_str(&format!(
            "\nComputed summary: {}\n\nWrite the weekly briefing:",
            self.algorithmic_summary
        ));
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_models::{AgentPayload, AgentRunResult, Location, Priority};

    #[test]
    fn test_prompt_lists_agents_and_actions() {
        let location = Location::new("loc-1", "harbour-st", "Harbour St");
        let ctx = AgentContext::for_week(&location, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        let phases = vec![PhaseReport {
            phase: PhaseId::Signals,
            agents: vec![
                AgentRunResult::completed("waste_risk", 3, 80, "2 items at risk", AgentPayload::Empty),
                AgentRunResult::failed("demand_forecast", 3, "no sales data"),
            ],
            duration_ms: 3,
        }];
        let actions = vec![ActionItem::new(Priority::Medium, "waste_risk", "Use up cream", "Waste risk 80/100")];

        let input = NarrativeInput::new(&ctx, &phases, &actions, "2 agent results");
        let prompt = input.to_prompt();

        assert_eq!(input.agents.len(), 2);
        assert!(prompt.contains("Week: 2026-10-12 to 2026-10-18"));
        assert!(prompt.contains("- [phase 1] demand_forecast (failed): no sales data"));
        assert!(prompt.contains("- MEDIUM Use up cream: Waste risk 80/100"));
    }
}
