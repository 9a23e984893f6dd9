//! Deterministic plain-text roll-up of a run.

use briefing_models::{ActionItem, AgentStatus, PhaseReport, Priority};

/// Number of HIGH item titles quoted in the summary.
const TOP_ITEMS: usize = 3;

/// Summarizes agent outcomes and action counts.
///
/// Always returns a non-empty string, including when every agent failed.
pub fn algorithmic_summary(phases: &[PhaseReport], actions: &[ActionItem]) -> String {
    let results = || phases.iter().flat_map(|p| p.agents.iter());
    let count = |status: AgentStatus| results().filter(|r| r.status == status).count();
    let priority = |p: Priority| actions.iter().filter(|a| a.priority == p).count();

    let mut summary = format!(
        "{} agent results: {} completed, {} failed, {} skipped.",
        results().count(),
        count(AgentStatus::Completed),
        count(AgentStatus::Failed),
        count(AgentStatus::Skipped),
    );

    if actions.is_empty() {
        summary.push_str(" No actions this week.");
        return summary;
    }

    summary.push_str(&format!(
        " {} action{}: {} high, {} medium, {} low.",
        actions.len(),
        if actions.len() == 1 { "" } else { "s" },
        priority(Priority::High),
        priority(Priority::Medium),
        priority(Priority::Low),
    ));

    let top: Vec<&str> = actions
        .iter()
        .filter(|a| a.priority == Priority::High)
        .take(TOP_ITEMS)
        .map(|a| a.title.as_str())
        .collect();
    if !top.is_empty() {
        summary.push_str(&format!(" Top priorities: {}.", top.join("; ")));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_models::{AgentPayload, AgentRunResult, PhaseId};

    fn phase(results: Vec<AgentRunResult>) -> PhaseReport {
        PhaseReport {
            phase: PhaseId::Signals,
            agents: results,
            duration_ms: 5,
        }
    }

    #[test]
    fn test_summary_when_everything_failed() {
        let phases = vec![phase(vec![
            AgentRunResult::failed("demand_forecast", 1, "boom"),
            AgentRunResult::failed("waste_risk", 1, "boom"),
        ])];

        let summary = algorithmic_summary(&phases, &[]);
        assert_eq!(
            summary,
            "2 agent results: 0 completed, 2 failed, 0 skipped. No actions this week."
        );
    }

    #[test]
    fn test_summary_counts_and_top_items() {
        let phases = vec![phase(vec![AgentRunResult::completed(
            "temperature_anomaly",
            1,
            90,
            "1 critical",
            AgentPayload::Empty,
        )])];
        let actions = vec![
            ActionItem::new(Priority::High, "temperature_anomaly", "Critical temperature: Fridge 1", ""),
            ActionItem::new(Priority::Medium, "waste_risk", "Use up cream", ""),
        ];

        let summary = algorithmic_summary(&phases, &actions);
        assert_eq!(
            summary,
            "1 agent results: 1 completed, 0 failed, 0 skipped. 2 actions: 1 high, 1 medium, 0 low. \
             Top priorities: Critical temperature: Fridge 1."
        );
    }
}
