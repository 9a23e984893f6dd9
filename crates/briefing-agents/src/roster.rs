//! The set of agents wired into one briefing service.

use std::path::PathBuf;
use std::sync::Arc;

use briefing_models::{agent_names, DemandForecast, PhaseId};

use crate::agent::{Agent, DependentAgent};
use crate::feed::{FeedAgent, FeedRotationAgent, FeedSource};

/// One agent per slot of the phase graph.
///
/// The slot decides the agent's name; results are reported under the
/// names in [`agent_names`].
#[derive(Clone)]
pub struct AgentRoster {
    pub demand_forecast: Arc<dyn Agent>,
    pub temperature_anomaly: Arc<dyn Agent>,
    pub waste_risk: Arc<dyn Agent>,
    pub recipe_suggestions: Arc<dyn Agent>,
    pub haccp_compliance: Arc<dyn Agent>,
    pub allergen_check: Arc<dyn Agent>,
    pub rotation_fill: Arc<dyn DependentAgent<DemandForecast>>,
}

impl AgentRoster {
    /// A roster that replays exported feeds from `root`.
    pub fn from_feeds(root: impl Into<PathBuf>) -> Self {
        let source = FeedSource::new(root);
        let feed = |name: &'static str| -> Arc<dyn Agent> {
            Arc::new(FeedAgent::new(name, source.clone()))
        };

        Self {
            demand_forecast: feed(agent_names::DEMAND_FORECAST),
            temperature_anomaly: feed(agent_names::TEMPERATURE_ANOMALY),
            waste_risk: feed(agent_names::WASTE_RISK),
            recipe_suggestions: feed(agent_names::RECIPE_SUGGESTIONS),
            haccp_compliance: feed(agent_names::HACCP_COMPLIANCE),
            allergen_check: feed(agent_names::ALLERGEN_CHECK),
            rotation_fill: Arc::new(FeedRotationAgent::new(source.clone())),
        }
    }

    /// Context-only agents of a phase, paired with their names.
    ///
    /// The rotation phase has no context-only agents; its agent is reached
    /// through [`AgentRoster::rotation_fill`].
    pub fn phase_agents(&self, phase: PhaseId) -> Vec<(&'static str, Arc<dyn Agent>)> {
        match phase {
            PhaseId::Signals => vec![
                (agent_names::DEMAND_FORECAST, Arc::clone(&self.demand_forecast)),
                (agent_names::TEMPERATURE_ANOMALY, Arc::clone(&self.temperature_anomaly)),
                (agent_names::WASTE_RISK, Arc::clone(&self.waste_risk)),
            ],
            PhaseId::Planning => vec![
                (agent_names::RECIPE_SUGGESTIONS, Arc::clone(&self.recipe_suggestions)),
                (agent_names::HACCP_COMPLIANCE, Arc::clone(&self.haccp_compliance)),
                (agent_names::ALLERGEN_CHECK, Arc::clone(&self.allergen_check)),
            ],
            PhaseId::Rotation | PhaseId::Narrative => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_agents_match_phase_graph() {
        let roster = AgentRoster::from_feeds("/feeds");
        for phase in [PhaseId::Signals, PhaseId::Planning] {
            let names: Vec<&str> = roster.phase_agents(phase).iter().map(|(n, _)| *n).collect();
            assert_eq!(names, phase.agents());
        }
        assert!(roster.phase_agents(PhaseId::Rotation).is_empty());
    }
}
