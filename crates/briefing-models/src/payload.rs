//! Typed agent payloads.
//!
//! Each agent kind returns its own payload variant so the conflict resolver
//! can pattern-match instead of probing untyped JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Payload produced by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentPayload {
    /// Cover forecast.
    DemandForecast(DemandForecast),
    /// Temperature anomalies.
    TemperatureAnomalies(TemperatureAnomalies),
    /// Waste-risk scores.
    WasteRisk(WasteRisk),
    /// Recipe suggestions.
    RecipeSuggestions(RecipeSuggestions),
    /// HACCP compliance health.
    ComplianceHealth(ComplianceHealth),
    /// Planned dishes and guest allergen profiles.
    AllergenExposure(AllergenExposure),
    /// Rotation fill metrics.
    RotationFill(RotationFill),
    /// No data (failed or skipped agents).
    #[default]
    Empty,
}

impl AgentPayload {
    /// Returns true for the empty payload.
    pub fn is_empty(&self) -> bool {
        matches!(self, AgentPayload::Empty)
    }
}

/// Expected covers for one service day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandDay {
    pub date: NaiveDate,
    /// Forecast covers for the day.
    pub expected_covers: u32,
    /// Rolling baseline the forecaster compares against.
    pub baseline_covers: u32,
}

impl DemandDay {
    /// Relative change of the forecast over the baseline (0.25 = +25%).
    ///
    /// Returns `None` when there is no baseline to compare against.
    pub fn uplift(&self) -> Option<f64> {
        if self.baseline_covers == 0 {
            return None;
        }
        let baseline = f64::from(self.baseline_covers);
        Some((f64::from(self.expected_covers) - baseline) / baseline)
    }
}

/// Weekly cover forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DemandForecast {
    pub days: Vec<DemandDay>,
}

impl DemandForecast {
    /// Total forecast covers for the week.
    pub fn total_covers(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.expected_covers)).sum()
    }
}

/// Severity of a temperature anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Info,
    Warning,
    Critical,
}

/// A temperature reading outside its safe band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureAnomaly {
    /// Equipment label, e.g. "Walk-in fridge 2".
    pub equipment: String,
    pub reading_celsius: f64,
    pub severity: AnomalySeverity,
    pub recorded_at: DateTime<Utc>,
}

/// Temperature anomalies detected in the HACCP logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TemperatureAnomalies {
    pub anomalies: Vec<TemperatureAnomaly>,
}

/// An ingredient with a waste-risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteRiskItem {
    pub ingredient: String,
    /// 0-100, higher means more likely to be wasted.
    pub risk_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
    /// Recipe that could use the ingredient up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
}

/// Waste-risk scores for the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WasteRisk {
    pub items: Vec<WasteRiskItem>,
}

/// A suggested recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    pub recipe_id: String,
    pub title: String,
    pub reason: String,
}

/// Ranked recipe suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecipeSuggestions {
    pub suggestions: Vec<RecipeSuggestion>,
}

/// HACCP compliance health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ComplianceHealth {
    /// 0-100.
    pub health_score: u8,
    #[serde(default)]
    pub open_issues: Vec<String>,
}

/// A dish planned on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedDish {
    pub recipe_id: String,
    pub title: String,
    pub date: NaiveDate,
    /// Allergen codes, e.g. "GLUTEN", "SESAME".
    pub allergens: Vec<String>,
}

/// A guest allergen profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestProfile {
    pub name: String,
    pub allergens: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Planned dishes alongside the guest profiles they are served to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AllergenExposure {
    pub planned_dishes: Vec<PlannedDish>,
    pub guest_profiles: Vec<GuestProfile>,
}

/// Menu rotation metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RotationFill {
    /// Share of rotation slots with a dish assigned (0.0-1.0).
    pub fill_rate: f64,
    /// Variety across the rotation (0.0-1.0).
    pub variety_score: f64,
    #[serde(default)]
    pub unfilled_slots: Vec<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, expected: u32, baseline: u32) -> DemandDay {
        DemandDay {
            date: NaiveDate::from_ymd_opt(2026, 10, d).unwrap(),
            expected_covers: expected,
            baseline_covers: baseline,
        }
    }

    #[test]
    fn test_uplift_against_baseline() {
        assert_eq!(day(12, 150, 100).uplift(), Some(0.5));
        assert_eq!(day(12, 80, 100).uplift(), Some(-0.2));
        assert_eq!(day(12, 80, 0).uplift(), None);
    }

    #[test]
    fn test_total_covers() {
        let forecast = DemandForecast {
            days: vec![day(12, 90, 100), day(13, 180, 100), day(14, 120, 100)],
        };
        assert_eq!(forecast.total_covers(), 390);
    }

    #[test]
    fn test_total_covers_beyond_u32() {
        let forecast = DemandForecast {
            days: vec![day(12, u32::MAX, 100), day(13, u32::MAX, 100)],
        };
        assert_eq!(forecast.total_covers(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_payload_tagged_by_kind() {
        let payload = AgentPayload::ComplianceHealth(ComplianceHealth {
            health_score: 64,
            open_issues: vec!["Missing probe calibration".into()],
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "compliance_health");
        assert_eq!(json["health_score"], 64);

        let empty = serde_json::to_value(AgentPayload::Empty).unwrap();
        assert_eq!(empty["kind"], "empty");
    }

    #[test]
    fn test_guest_profile_active_by_default() {
        let profile: GuestProfile =
            serde_json::from_str(r#"{"name":"Table 4","allergens":["PEANUT"]}"#).unwrap();
        assert!(profile.active);
    }
}
