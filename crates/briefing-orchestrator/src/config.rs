//! Orchestrator configuration.

use std::time::Duration;

use briefing_resolver::ResolverThresholds;

/// Configuration for [`crate::BriefingService`].
#[derive(Debug, Clone)]
pub struct BriefingConfig {
    /// Deadline for every agent of one phase.
    pub phase_timeout: Duration,
    /// Deadline for the narrative phase.
    pub narrative_timeout: Duration,
    /// Cut-offs for the conflict resolver.
    pub thresholds: ResolverThresholds,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            phase_timeout: Duration::from_secs(120),
            narrative_timeout: Duration::from_secs(45),
            thresholds: ResolverThresholds::default(),
        }
    }
}

impl BriefingConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-phase deadline.
    pub fn with_phase_timeout(mut self, timeout: Duration) -> Self {
        self.phase_timeout = timeout;
        self
    }

    /// Sets the narrative deadline.
    pub fn with_narrative_timeout(mut self, timeout: Duration) -> Self {
        self.narrative_timeout = timeout;
        self
    }

    /// Sets the resolver thresholds.
    pub fn with_thresholds(mut self, thresholds: ResolverThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BriefingConfig::default();

        assert_eq!(config.phase_timeout, Duration::from_secs(120));
        assert_eq!(config.narrative_timeout, Duration::from_secs(45));
        assert_eq!(config.thresholds, ResolverThresholds::default());
    }

    #[test]
    fn test_config_builder() {
        let config = BriefingConfig::new()
            .with_phase_timeout(Duration::from_secs(5))
            .with_narrative_timeout(Duration::from_secs(2))
            .with_thresholds(ResolverThresholds {
                waste_risk_min: 50,
                ..ResolverThresholds::default()
            });

        assert_eq!(config.phase_timeout, Duration::from_secs(5));
        assert_eq!(config.narrative_timeout, Duration::from_secs(2));
        assert_eq!(config.thresholds.waste_risk_min, 50);
    }
}
