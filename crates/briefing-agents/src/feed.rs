//! Agents backed by exported analysis feeds.
//!
//! The kitchen app exports each analysis as a JSON document:
//!
//! ```text
//! <root>/<location_slug>/<week_start>/<agent_name>.json
//! ```
//!
//! with the shape `{ "summary": .., "confidence": .., "data": { "kind": .., .. } }`.
//! A feed whose `data` is `{"kind": "empty"}` is reported as skipped.

use std::path::PathBuf;

use async_trait::async_trait;
use briefing_models::{agent_names, AgentContext, AgentPayload, DemandForecast};
use serde::Deserialize;
use tracing::debug;

use crate::agent::{Agent, AgentOutput, DependentAgent};
use crate::error::{AgentError, Result};

/// One exported analysis.
#[derive(Debug, Clone, Deserialize)]
struct FeedDocument {
    summary: String,
    #[serde(default)]
    confidence: u8,
    #[serde(default)]
    data: AgentPayload,
}

/// Directory of exported feeds.
#[derive(Debug, Clone)]
pub struct FeedSource {
    root: PathBuf,
}

impl FeedSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the feed for one agent, location and week.
    pub fn feed_path(&self, agent: &str, ctx: &AgentContext) -> PathBuf {
        self.root
            .join(&ctx.location_slug)
            .join(ctx.week_start.format("%Y-%m-%d").to_string())
            .join(format!("{}.json", agent))
    }

    async fn load(&self, agent: &str, ctx: &AgentContext) -> Result<FeedDocument> {
        let path = self.feed_path(agent, ctx);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AgentError::FeedMissing(path));
            }
            Err(source) => return Err(AgentError::FeedRead { path, source }),
        };

        debug!(agent = %agent, path = %path.display(), "loaded feed");
        serde_json::from_str(&content).map_err(|e| AgentError::InvalidFeed {
            path,
            message: e.to_string(),
        })
    }
}

/// Payload kind an agent is expected to export.
fn expected_kind(agent: &str) -> Option<&'static str> {
    match agent {
        agent_names::DEMAND_FORECAST => Some("demand_forecast"),
        agent_names::TEMPERATURE_ANOMALY => Some("temperature_anomalies"),
        agent_names::WASTE_RISK => Some("waste_risk"),
        agent_names::RECIPE_SUGGESTIONS => Some("recipe_suggestions"),
        agent_names::HACCP_COMPLIANCE => Some("compliance_health"),
        agent_names::ALLERGEN_CHECK => Some("allergen_exposure"),
        agent_names::ROTATION_FILL => Some("rotation_fill"),
        _ => None,
    }
}

fn payload_kind(payload: &AgentPayload) -> &'static str {
    match payload {
        AgentPayload::DemandForecast(_) => "demand_forecast",
        AgentPayload::TemperatureAnomalies(_) => "temperature_anomalies",
        AgentPayload::WasteRisk(_) => "waste_risk",
        AgentPayload::RecipeSuggestions(_) => "recipe_suggestions",
        AgentPayload::ComplianceHealth(_) => "compliance_health",
        AgentPayload::AllergenExposure(_) => "allergen_exposure",
        AgentPayload::RotationFill(_) => "rotation_fill",
        AgentPayload::Empty => "empty",
    }
}

fn into_output(agent: &str, path: PathBuf, doc: FeedDocument) -> Result<AgentOutput> {
    if doc.data.is_empty() {
        return Ok(AgentOutput::skipped(doc.summary));
    }

    let actual = payload_kind(&doc.data);
    if let Some(expected) = expected_kind(agent) {
        if expected != actual {
            return Err(AgentError::InvalidFeed {
                path,
                message: format!("expected {} data, found {}", expected, actual),
            });
        }
    }

    Ok(AgentOutput::completed(doc.summary, doc.confidence, doc.data))
}

/// Context-only agent that replays an exported feed.
pub struct FeedAgent {
    name: &'static str,
    source: FeedSource,
}

impl FeedAgent {
    pub fn new(name: &'static str, source: FeedSource) -> Self {
        Self { name, source }
    }
}

#[async_trait]
impl Agent for FeedAgent {
    async fn analyze(&self, ctx: &AgentContext) -> Result<AgentOutput> {
        let doc = self.source.load(self.name, ctx).await?;
        into_output(self.name, self.source.feed_path(self.name, ctx), doc)
    }
}

/// Rotation-fill feed agent that requires the week's demand forecast.
pub struct FeedRotationAgent {
    source: FeedSource,
}

impl FeedRotationAgent {
    pub fn new(source: FeedSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl DependentAgent<DemandForecast> for FeedRotationAgent {
    async fn analyze(
        &self,
        ctx: &AgentContext,
        forecast: Option<&DemandForecast>,
    ) -> Result<AgentOutput> {
        let Some(forecast) = forecast else {
            return Ok(AgentOutput::skipped(
                "No demand forecast available; rotation fill not computed",
            ));
        };

        let name = agent_names::ROTATION_FILL;
        let doc = self.source.load(name, ctx).await?;
        let output = into_output(name, self.source.feed_path(name, ctx), doc)?;

        Ok(match output {
            AgentOutput::Completed {
                summary,
                confidence,
                data,
            } => AgentOutput::completed(
                format!("{} (against {} forecast covers)", summary, forecast.total_covers()),
                confidence,
                data,
            ),
            skipped => skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_models::{DemandDay, Location};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn ctx() -> AgentContext {
        let location = Location::new("loc-1", "harbour-st", "Harbour St");
        AgentContext::for_week(&location, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap())
    }

    fn write_feed(source: &FeedSource, agent: &str, body: &str) {
        let path = source.feed_path(agent, &ctx());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    #[test]
    fn test_feed_path_layout() {
        let source = FeedSource::new("/feeds");
        let path = source.feed_path("waste_risk", &ctx());
        assert_eq!(path, PathBuf::from("/feeds/harbour-st/2026-10-12/waste_risk.json"));
    }

    #[tokio::test]
    async fn test_feed_agent_reads_payload() {
        let dir = tempdir().unwrap();
        let source = FeedSource::new(dir.path());
        write_feed(
            &source,
            agent_names::HACCP_COMPLIANCE,
            r#"{"summary":"Health score 64","confidence":90,
                "data":{"kind":"compliance_health","health_score":64,"open_issues":["Probe uncalibrated"]}}"#,
        );

        let agent = FeedAgent::new(agent_names::HACCP_COMPLIANCE, source);
        let output = agent.analyze(&ctx()).await.unwrap();

        match output {
            AgentOutput::Completed { confidence, data, .. } => {
                assert_eq!(confidence, 90);
                assert!(matches!(data, AgentPayload::ComplianceHealth(ref h) if h.health_score == 64));
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_feed_is_an_error() {
        let dir = tempdir().unwrap();
        let agent = FeedAgent::new(agent_names::WASTE_RISK, FeedSource::new(dir.path()));

        let err = agent.analyze(&ctx()).await.unwrap_err();
        assert!(matches!(err, AgentError::FeedMissing(_)));
    }

    #[tokio::test]
    async fn test_wrong_payload_kind_is_rejected() {
        let dir = tempdir().unwrap();
        let source = FeedSource::new(dir.path());
        write_feed(
            &source,
            agent_names::WASTE_RISK,
            r#"{"summary":"oops","confidence":50,"data":{"kind":"rotation_fill","fill_rate":1.0,"variety_score":1.0}}"#,
        );

        let agent = FeedAgent::new(agent_names::WASTE_RISK, source);
        let err = agent.analyze(&ctx()).await.unwrap_err();
        assert!(err.to_string().contains("expected waste_risk data"));
    }

    #[tokio::test]
    async fn test_empty_feed_is_skipped() {
        let dir = tempdir().unwrap();
        let source = FeedSource::new(dir.path());
        write_feed(
            &source,
            agent_names::RECIPE_SUGGESTIONS,
            r#"{"summary":"No recipes in catalogue","data":{"kind":"empty"}}"#,
        );

        let agent = FeedAgent::new(agent_names::RECIPE_SUGGESTIONS, source);
        let output = agent.analyze(&ctx()).await.unwrap();
        assert_eq!(output, AgentOutput::skipped("No recipes in catalogue"));
    }

    #[tokio::test]
    async fn test_rotation_skips_without_forecast() {
        let dir = tempdir().unwrap();
        let agent = FeedRotationAgent::new(FeedSource::new(dir.path()));

        let output = agent.analyze(&ctx(), None).await.unwrap();
        assert!(matches!(output, AgentOutput::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_rotation_mentions_forecast_covers() {
        let dir = tempdir().unwrap();
        let source = FeedSource::new(dir.path());
        write_feed(
            &source,
            agent_names::ROTATION_FILL,
            r#"{"summary":"Rotation 90% filled","confidence":75,
                "data":{"kind":"rotation_fill","fill_rate":0.9,"variety_score":0.7}}"#,
        );
        let forecast = DemandForecast {
            days: vec![DemandDay {
                date: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
                expected_covers: 140,
                baseline_covers: 120,
            }],
        };

        let agent = FeedRotationAgent::new(source);
        let output = agent.analyze(&ctx(), Some(&forecast)).await.unwrap();

        match output {
            AgentOutput::Completed { summary, .. } => {
                assert_eq!(summary, "Rotation 90% filled (against 140 forecast covers)");
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }
}
