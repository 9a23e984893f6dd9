//! The standard kitchen rules.

use briefing_models::{agent_names, AgentPayload, AnomalySeverity, Priority};
use serde::{Deserialize, Serialize};

use crate::resolver::{Finding, Rule};

/// Cut-offs used by the standard rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverThresholds {
    /// Compliance health scores strictly below this are HIGH.
    pub health_score_min: u8,
    /// Waste-risk scores at or above this are MEDIUM.
    pub waste_risk_min: u8,
    /// Demand days whose uplift over baseline exceeds this are MEDIUM.
    pub demand_uplift: f64,
    /// Rotation fill rates strictly below this are MEDIUM.
    pub fill_rate_min: f64,
    /// Rotation variety scores strictly below this are LOW.
    pub variety_min: f64,
}

impl Default for ResolverThresholds {
    fn default() -> Self {
        Self {
            health_score_min: 70,
            waste_risk_min: 70,
            demand_uplift: 0.25,
            fill_rate_min: 0.80,
            variety_min: 0.60,
        }
    }
}

/// Rules in evaluation order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "critical_temperature",
            agent_names::TEMPERATURE_ANOMALY,
            Priority::High,
            critical_temperature,
        ),
        Rule::new(
            "compliance_health",
            agent_names::HACCP_COMPLIANCE,
            Priority::High,
            compliance_health,
        ),
        Rule::new(
            "allergen_conflict",
            agent_names::ALLERGEN_CHECK,
            Priority::High,
            allergen_conflicts,
        ),
        Rule::new(
            "waste_risk",
            agent_names::WASTE_RISK,
            Priority::Medium,
            waste_risk,
        ),
        Rule::new(
            "demand_spike",
            agent_names::DEMAND_FORECAST,
            Priority::Medium,
            demand_spikes,
        ),
        Rule::new(
            "rotation_fill",
            agent_names::ROTATION_FILL,
            Priority::Medium,
            rotation_fill,
        ),
        Rule::new(
            "rotation_variety",
            agent_names::ROTATION_FILL,
            Priority::Low,
            rotation_variety,
        ),
    ]
}

fn critical_temperature(payload: &AgentPayload, _: &ResolverThresholds) -> Vec<Finding> {
    let AgentPayload::TemperatureAnomalies(t) = payload else {
        return Vec::new();
    };
    t.anomalies
        .iter()
        .filter(|a| a.severity == AnomalySeverity::Critical)
        .map(|a| {
            Finding::new(
                format!("Critical temperature: {}", a.equipment),
                format!(
                    "{:.1}°C recorded at {}. Check the unit and quarantine affected stock.",
                    a.reading_celsius,
                    a.recorded_at.format("%Y-%m-%d %H:%M UTC")
                ),
            )
            .with_date(a.recorded_at.date_naive())
        })
        .collect()
}

fn compliance_health(payload: &AgentPayload, th: &ResolverThresholds) -> Vec<Finding> {
    let AgentPayload::ComplianceHealth(h) = payload else {
        return Vec::new();
    };
    if h.health_score >= th.health_score_min {
        return Vec::new();
    }
    let detail = if h.open_issues.is_empty() {
        "No open issues listed; review the HACCP logs.".to_string()
    } else {
        format!("Open issues: {}", h.open_issues.join("; "))
    };
    vec![Finding::new(
        format!("HACCP compliance at {}/100", h.health_score),
        detail,
    )]
}

fn allergen_conflicts(payload: &AgentPayload, _: &ResolverThresholds) -> Vec<Finding> {
    let AgentPayload::AllergenExposure(exposure) = payload else {
        return Vec::new();
    };

    let mut findings = Vec::new();
    for dish in &exposure.planned_dishes {
        for profile in exposure.guest_profiles.iter().filter(|p| p.active) {
            let shared: Vec<&str> = dish
                .allergens
                .iter()
                .filter(|code| profile.allergens.contains(*code))
                .map(String::as_str)
                .collect();
            if shared.is_empty() {
                continue;
            }
            findings.push(
                Finding::new(
                    format!("Allergen conflict: {} for {}", dish.title, profile.name),
                    format!("Contains {}", shared.join(", ")),
                )
                .with_date(dish.date)
                .with_recipe(dish.recipe_id.clone()),
            );
        }
    }
    findings
}

fn waste_risk(payload: &AgentPayload, th: &ResolverThresholds) -> Vec<Finding> {
    let AgentPayload::WasteRisk(w) = payload else {
        return Vec::new();
    };
    w.items
        .iter()
        .filter(|item| item.risk_score >= th.waste_risk_min)
        .map(|item| {
            let mut detail = format!("Waste risk {}/100", item.risk_score);
            if let Some(recipe) = &item.recipe {
                detail.push_str(&format!("; use in {}", recipe));
            }
            let finding = Finding::new(format!("Use up {}", item.ingredient), detail);
            match item.expires_on {
                Some(date) => finding.with_date(date),
                None => finding,
            }
        })
        .collect()
}

fn demand_spikes(payload: &AgentPayload, th: &ResolverThresholds) -> Vec<Finding> {
    let AgentPayload::DemandForecast(f) = payload else {
        return Vec::new();
    };
    f.days
        .iter()
        .filter_map(|day| {
            let uplift = day.uplift()?;
            if uplift <= th.demand_uplift {
                return None;
            }
            Some(
                Finding::new(
                    format!("Demand spike on {}", day.date.format("%A %d %b")),
                    format!(
                        "{} covers expected vs {} baseline (+{:.0}%). Adjust prep and staffing.",
                        day.expected_covers,
                        day.baseline_covers,
                        uplift * 100.0
                    ),
                )
                .with_date(day.date),
            )
        })
        .collect()
}

fn rotation_fill(payload: &AgentPayload, th: &ResolverThresholds) -> Vec<Finding> {
    let AgentPayload::RotationFill(r) = payload else {
        return Vec::new();
    };
    if r.fill_rate >= th.fill_rate_min {
        return Vec::new();
    }
    let finding = Finding::new(
        format!("Menu rotation {:.0}% filled", r.fill_rate * 100.0),
        format!("{} unfilled slots this week", r.unfilled_slots.len()),
    );
    match r.unfilled_slots.iter().min() {
        Some(first) => vec![finding.with_date(*first)],
        None => vec![finding],
    }
}

fn rotation_variety(payload: &AgentPayload, th: &ResolverThresholds) -> Vec<Finding> {
    let AgentPayload::RotationFill(r) = payload else {
        return Vec::new();
    };
    if r.variety_score >= th.variety_min {
        return Vec::new();
    }
    vec![Finding::new(
        "Low menu variety",
        format!(
            "Variety score {:.2}; consider swapping repeated dishes",
            r.variety_score
        ),
    )]
}
