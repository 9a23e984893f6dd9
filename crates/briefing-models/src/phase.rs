//! The fixed phase graph of a briefing run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the agents wired into the briefing.
pub mod agent_names {
    /// Weekly cover forecast with a rolling baseline.
    pub const DEMAND_FORECAST: &str = "demand_forecast";
    /// Cold-chain and hot-holding temperature anomalies.
    pub const TEMPERATURE_ANOMALY: &str = "temperature_anomaly";
    /// Ingredients at risk of being wasted.
    pub const WASTE_RISK: &str = "waste_risk";
    /// Recipe suggestions for the week.
    pub const RECIPE_SUGGESTIONS: &str = "recipe_suggestions";
    /// HACCP log compliance health score.
    pub const HACCP_COMPLIANCE: &str = "haccp_compliance";
    /// Planned dishes versus active guest allergen profiles.
    pub const ALLERGEN_CHECK: &str = "allergen_check";
    /// Menu rotation fill rate and variety.
    pub const ROTATION_FILL: &str = "rotation_fill";
    /// Natural-language roll-up.
    pub const NARRATIVE: &str = "narrative";
}

/// A phase of the briefing pipeline.
///
/// Phases run in strict order; agents inside a phase run concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PhaseId {
    /// Forecasting, anomaly and risk signals (context only).
    Signals,
    /// Suggestions and compliance (context only).
    Planning,
    /// Rotation metrics, fed by the demand forecast.
    Rotation,
    /// Optional narrative enrichment.
    Narrative,
}

impl PhaseId {
    /// The analysis phases, in execution order.
    pub const ANALYSIS: [PhaseId; 3] = [PhaseId::Signals, PhaseId::Planning, PhaseId::Rotation];

    /// Returns the 1-based ordinal of the phase.
    pub fn ordinal(self) -> u8 {
        match self {
            PhaseId::Signals => 1,
            PhaseId::Planning => 2,
            PhaseId::Rotation => 3,
            PhaseId::Narrative => 4,
        }
    }

    /// Returns the agents that run in this phase.
    pub fn agents(self) -> &'static [&'static str] {
        use agent_names::*;
        match self {
            PhaseId::Signals => &[DEMAND_FORECAST, TEMPERATURE_ANOMALY, WASTE_RISK],
            PhaseId::Planning => &[RECIPE_SUGGESTIONS, HACCP_COMPLIANCE, ALLERGEN_CHECK],
            PhaseId::Rotation => &[ROTATION_FILL],
            PhaseId::Narrative => &[NARRATIVE],
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}

impl From<PhaseId> for u8 {
    fn from(phase: PhaseId) -> Self {
        phase.ordinal()
    }
}

impl TryFrom<u8> for PhaseId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PhaseId::Signals),
            2 => Ok(PhaseId::Planning),
            3 => Ok(PhaseId::Rotation),
            4 => Ok(PhaseId::Narrative),
            other => Err(format!("unknown phase: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordinals_are_sequential() {
        let ordinals: Vec<u8> = PhaseId::ANALYSIS.iter().map(|p| p.ordinal()).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn test_rotation_phase_holds_rotation_agent() {
        assert_eq!(PhaseId::Rotation.agents(), &[agent_names::ROTATION_FILL]);
    }

    #[test]
    fn test_phase_serializes_as_ordinal() {
        assert_eq!(serde_json::to_string(&PhaseId::Planning).unwrap(), "2");
        let parsed: PhaseId = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, PhaseId::Rotation);
        assert!(serde_json::from_str::<PhaseId>("9").is_err());
    }
}
