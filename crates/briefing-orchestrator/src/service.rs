//! The briefing service.

use std::sync::Arc;
use std::time::Instant;

use briefing_agents::{invoke, invoke_dependent, AgentRoster, InvocationScope};
use briefing_events::EventBus;
use briefing_models::{
    agent_names, AgentContext, AgentPayload, AgentResultRecord, AgentRunResult, AgentStatus,
    Briefing, BriefingEvent, DemandForecast, Location, PhaseId, PhaseReport, Run, RunId,
    RunStatus, SubscriptionId,
};
use briefing_narrative::{non_blank, NarrativeInput, NarrativeSynthesizer};
use briefing_persistence::{AgentResultRepository, PersistenceError, RunRepository};
use briefing_resolver::{algorithmic_summary, ConflictResolver};
use chrono::{NaiveDate, Utc};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::BriefingConfig;
use crate::error::{BriefingError, Result};
use crate::location::LocationDirectory;

/// Parameters of one briefing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefingRequest {
    pub location_slug: String,
    pub week_start: NaiveDate,
    pub triggered_by: Option<String>,
    /// Run record to reuse instead of opening a new one.
    pub run_id: Option<RunId>,
}

impl BriefingRequest {
    pub fn new(location_slug: impl Into<String>, week_start: NaiveDate) -> Self {
        Self {
            location_slug: location_slug.into(),
            week_start,
            triggered_by: None,
            run_id: None,
        }
    }

    pub fn with_triggered_by(mut self, who: impl Into<String>) -> Self {
        self.triggered_by = Some(who.into());
        self
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }
}

/// Orchestrates briefing runs and owns their progress bus.
pub struct BriefingService {
    roster: AgentRoster,
    runs: Arc<dyn RunRepository>,
    results: Arc<dyn AgentResultRepository>,
    locations: Arc<dyn LocationDirectory>,
    resolver: ConflictResolver,
    narrator: Option<Arc<dyn NarrativeSynthesizer>>,
    events: EventBus,
    config: BriefingConfig,
}

impl BriefingService {
    pub fn new(
        roster: AgentRoster,
        runs: Arc<dyn RunRepository>,
        results: Arc<dyn AgentResultRepository>,
        locations: Arc<dyn LocationDirectory>,
        config: BriefingConfig,
    ) -> Self {
        Self {
            roster,
            runs,
            results,
            locations,
            resolver: ConflictResolver::with_thresholds(config.thresholds.clone()),
            narrator: None,
            events: EventBus::new(),
            config,
        }
    }

    /// Enables the narrative phase.
    pub fn with_narrative(mut self, narrator: Arc<dyn NarrativeSynthesizer>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    /// Replaces the default resolver rules.
    pub fn with_resolver(mut self, resolver: ConflictResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &BriefingConfig {
        &self.config
    }

    pub fn has_narrative(&self) -> bool {
        self.narrator.is_some()
    }

    // ---- Observers ----

    /// Registers a progress callback for one run.
    pub fn subscribe<F>(&self, run_id: &RunId, callback: F) -> SubscriptionId
    where
        F: Fn(&BriefingEvent) + Send + Sync + 'static,
    {
        self.events.register(run_id, callback)
    }

    /// Removes a progress callback. Returns false if it was not registered.
    pub fn unsubscribe(&self, run_id: &RunId, subscription: &SubscriptionId) -> bool {
        self.events.unregister(run_id, subscription)
    }

    /// Subscribes through a channel; the receiver sees every later event.
    pub fn subscribe_channel(
        &self,
        run_id: &RunId,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<BriefingEvent>) {
        self.events.subscribe_channel(run_id)
    }

    // ---- Audit reads ----

    pub fn load_run(&self, run_id: &RunId) -> Result<Run> {
        self.runs.load_run(run_id).map_err(|e| match e {
            PersistenceError::NotFound { .. } => BriefingError::RunNotFound(run_id.clone()),
            other => other.into(),
        })
    }

    pub fn list_agent_results(&self, run_id: &RunId) -> Result<Vec<AgentResultRecord>> {
        Ok(self.results.list_results(run_id)?)
    }

    pub fn list_runs(&self) -> Result<Vec<Run>> {
        Ok(self.runs.list_runs()?)
    }

    // ---- Runs ----

    /// Creates a running record without executing it.
    ///
    /// Lets observers subscribe before the first event; execute with
    /// [`BriefingService::run_briefing`] passing the returned id.
    pub fn open_run(
        &self,
        location_slug: &str,
        week_start: NaiveDate,
        triggered_by: Option<String>,
    ) -> Result<RunId> {
        let location = self.find_location(location_slug)?;
        let run = Run::start(&location, week_start, triggered_by);
        self.runs.create_run(&run)?;
        info!(run_id = %run.id, location = %location.slug, %week_start, "run opened");
        Ok(run.id)
    }

    /// Runs a briefing to completion.
    pub async fn run_briefing(
        &self,
        location_slug: &str,
        week_start: NaiveDate,
        triggered_by: Option<String>,
        existing_run_id: Option<RunId>,
    ) -> Result<Briefing> {
        let request = BriefingRequest {
            location_slug: location_slug.to_string(),
            week_start,
            triggered_by,
            run_id: existing_run_id,
        };
        self.run_briefing_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Runs a briefing, stopping early if `cancel` fires.
    ///
    /// Agent failures are recorded in the briefing. Anything else (a store
    /// failure, cancellation) marks the run failed, broadcasts the terminal
    /// event and is returned.
    pub async fn run_briefing_with_cancel(
        &self,
        request: BriefingRequest,
        cancel: CancellationToken,
    ) -> Result<Briefing> {
        let started = Instant::now();
        let location = self.find_location(&request.location_slug)?;
        let mut run = self.prepare_run(&location, &request, started)?;

        info!(
            run_id = %run.id,
            location = %location.slug,
            week_start = %request.week_start,
            "briefing started"
        );

        match self.execute(&mut run, &location, &cancel, started).await {
            Ok(briefing) => {
                info!(
                    run_id = %run.id,
                    actions = briefing.actions.len(),
                    has_ai_summary = briefing.has_ai_summary,
                    duration_ms = briefing.duration_ms,
                    "briefing completed"
                );
                Ok(briefing)
            }
            Err(err) => {
                error!(run_id = %run.id, error = %err, "briefing failed");
                self.fail_run(&mut run, &err, started);
                Err(err)
            }
        }
    }

    fn find_location(&self, slug: &str) -> Result<Location> {
        self.locations
            .find_by_slug(slug)
            .ok_or_else(|| BriefingError::LocationNotFound(slug.to_string()))
    }

    fn prepare_run(
        &self,
        location: &Location,
        request: &BriefingRequest,
        started: Instant,
    ) -> Result<Run> {
        let Some(run_id) = &request.run_id else {
            let run = Run::start(location, request.week_start, request.triggered_by.clone());
            self.runs.create_run(&run)?;
            return Ok(run);
        };

        let mut run = self.load_run(run_id)?;
        if run.status.is_terminal() {
            return Err(BriefingError::RunAlreadyFinished(run.id, run.status));
        }

        if run.location_slug != location.slug || run.week_start != request.week_start {
            warn!(
                run_id = %run.id,
                stored_location = %run.location_slug,
                stored_week = %run.week_start,
                "rescoping reused run to the requested location and week"
            );
            run.location_id = location.id.clone();
            run.location_slug = location.slug.clone();
            run.week_start = request.week_start;
        }
        if request.triggered_by.is_some() {
            run.triggered_by = request.triggered_by.clone();
        }
        if let Err(e) = self.runs.update_run(&run) {
            let err = BriefingError::from(e);
            error!(run_id = %run.id, error = %err, "could not reopen run");
            self.fail_run(&mut run, &err, started);
            return Err(err);
        }
        Ok(run)
    }

    async fn execute(
        &self,
        run: &mut Run,
        location: &Location,
        cancel: &CancellationToken,
        started: Instant,
    ) -> Result<Briefing> {
        let ctx = Arc::new(AgentContext::for_week(location, run.week_start));

        let signals = self.run_phase(&run.id, PhaseId::Signals, &ctx, None, cancel).await?;
        let forecast = demand_forecast(&signals);
        let planning = self.run_phase(&run.id, PhaseId::Planning, &ctx, None, cancel).await?;
        let rotation = self
            .run_phase(&run.id, PhaseId::Rotation, &ctx, forecast, cancel)
            .await?;
        let phases = vec![signals, planning, rotation];

        let results: Vec<AgentRunResult> =
            phases.iter().flat_map(|p| p.agents.iter().cloned()).collect();
        let actions = self.resolver.resolve(&results);
        let mut summary = algorithmic_summary(&phases, &actions);
        let mut has_ai_summary = false;

        if let Some(narrator) = &self.narrator {
            let input = NarrativeInput::new(&ctx, &phases, &actions, summary.clone());
            if let Some(narrative) = self.run_narrative(&run.id, narrator, input, cancel).await? {
                summary = narrative;
                has_ai_summary = true;
            }
        }
        if cancel.is_cancelled() {
            return Err(BriefingError::Cancelled);
        }

        let briefing = Briefing {
            run_id: run.id.clone(),
            location_id: ctx.location_id.clone(),
            location_slug: ctx.location_slug.clone(),
            week_start: ctx.week_start,
            week_end: ctx.week_end,
            phases,
            actions,
            summary,
            has_ai_summary,
            generated_at: Utc::now(),
            duration_ms: elapsed_ms(started),
        };

        // Only adopt the completed record once the store accepted it, so a
        // failed write still leaves `run` free to be marked failed.
        let mut finished = run.clone();
        finished.complete(
            briefing.summary.clone(),
            briefing.has_ai_summary,
            serde_json::to_value(&briefing)?,
            briefing.duration_ms,
        )?;
        self.runs.update_run(&finished)?;
        *run = finished;

        self.events.emit(
            &run.id,
            &BriefingEvent::BriefingComplete {
                run_id: run.id.clone(),
                status: RunStatus::Completed,
                action_count: briefing.actions.len(),
                has_ai_summary: briefing.has_ai_summary,
                duration_ms: briefing.duration_ms,
            },
        );
        self.events.clear_run(&run.id);

        Ok(briefing)
    }

    async fn run_phase(
        &self,
        run_id: &RunId,
        phase: PhaseId,
        ctx: &Arc<AgentContext>,
        forecast: Option<Arc<DemandForecast>>,
        cancel: &CancellationToken,
    ) -> Result<PhaseReport> {
        if cancel.is_cancelled() {
            return Err(BriefingError::Cancelled);
        }

        let started = Instant::now();
        let scope = InvocationScope::new(cancel.clone(), self.config.phase_timeout);

        let invocations: Vec<(&'static str, BoxFuture<'_, AgentRunResult>)> = match phase {
            PhaseId::Rotation => vec![(
                agent_names::ROTATION_FILL,
                invoke_dependent(
                    agent_names::ROTATION_FILL,
                    Arc::clone(&self.roster.rotation_fill),
                    Arc::clone(ctx),
                    forecast,
                    &scope,
                )
                .boxed(),
            )],
            _ => self
                .roster
                .phase_agents(phase)
                .into_iter()
                .map(|(name, agent)| (name, invoke(name, agent, Arc::clone(ctx), &scope).boxed()))
                .collect(),
        };

        self.events.emit(
            run_id,
            &BriefingEvent::PhaseStart {
                phase,
                agents: invocations.iter().map(|(name, _)| name.to_string()).collect(),
            },
        );
        debug!(run_id = %run_id, %phase, agents = invocations.len(), "phase started");

        let landed = invocations.into_iter().map(|(name, invocation)| {
            self.events.emit(
                run_id,
                &BriefingEvent::AgentStart {
                    phase,
                    agent: name.to_string(),
                },
            );
            async move {
                let result = invocation.await;
                self.events.emit(
                    run_id,
                    &BriefingEvent::AgentComplete {
                        phase,
                        agent: result.agent_name.clone(),
                        status: result.status,
                        duration_ms: result.duration_ms,
                        confidence: result.confidence,
                        summary: result.result_summary.clone(),
                    },
                );
                let stored = self
                    .results
                    .append_result(&AgentResultRecord::new(run_id.clone(), result.clone()));
                (result, stored)
            }
        });
        // Collect eagerly so every agent-start is emitted before any agent
        // is polled.
        let landed: Vec<_> = landed.collect();

        let mut agents = Vec::with_capacity(landed.len());
        for (result, stored) in join_all(landed).await {
            stored?;
            agents.push(result);
        }

        let report = PhaseReport {
            phase,
            duration_ms: elapsed_ms(started),
            agents,
        };
        let count = |status: AgentStatus| report.agents.iter().filter(|r| r.status == status).count();
        self.events.emit(
            run_id,
            &BriefingEvent::PhaseComplete {
                phase,
                duration_ms: report.duration_ms,
                completed: count(AgentStatus::Completed),
                failed: count(AgentStatus::Failed),
                skipped: count(AgentStatus::Skipped),
            },
        );
        info!(
            run_id = %run_id,
            %phase,
            completed = count(AgentStatus::Completed),
            failed = count(AgentStatus::Failed),
            skipped = count(AgentStatus::Skipped),
            duration_ms = report.duration_ms,
            "phase complete"
        );

        if cancel.is_cancelled() {
            return Err(BriefingError::Cancelled);
        }
        Ok(report)
    }

    /// Runs the narrative phase. Any failure leaves the caller's summary in
    /// place; the outcome is only reported through events and logs.
    /// Cancellation is the one outcome that ends the run.
    async fn run_narrative(
        &self,
        run_id: &RunId,
        narrator: &Arc<dyn NarrativeSynthesizer>,
        input: NarrativeInput,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let phase = PhaseId::Narrative;
        let agent = agent_names::NARRATIVE.to_string();
        let started = Instant::now();

        self.events.emit(
            run_id,
            &BriefingEvent::PhaseStart {
                phase,
                agents: vec![agent.clone()],
            },
        );
        self.events.emit(
            run_id,
            &BriefingEvent::AgentStart {
                phase,
                agent: agent.clone(),
            },
        );

        let narrator = Arc::clone(narrator);
        let mut task = tokio::spawn(async move { narrator.synthesize(&input).await });
        let deadline = tokio::time::sleep(self.config.narrative_timeout);
        let mut cancelled = false;
        let outcome = tokio::select! {
            biased;
            joined = &mut task => match joined {
                Ok(Ok(Some(text))) => Ok(non_blank(&text)),
                Ok(Ok(None)) => Ok(None),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(format!("narrator task failed: {}", e)),
            },
            _ = cancel.cancelled() => {
                task.abort();
                cancelled = true;
                Err("cancelled".to_string())
            }
            _ = deadline => {
                task.abort();
                Err(format!(
                    "timed out after {}s",
                    self.config.narrative_timeout.as_secs_f64()
                ))
            }
        };

        let duration_ms = elapsed_ms(started);
        let (status, summary, narrative) = match outcome {
            Ok(Some(text)) => (AgentStatus::Completed, "narrative generated".to_string(), Some(text)),
            Ok(None) => (AgentStatus::Skipped, "narrator returned nothing".to_string(), None),
            Err(message) if cancelled => (AgentStatus::Failed, message, None),
            Err(message) => {
                warn!(run_id = %run_id, error = %message, "narrative failed, keeping algorithmic summary");
                (AgentStatus::Failed, message, None)
            }
        };

        self.events.emit(
            run_id,
            &BriefingEvent::AgentComplete {
                phase,
                agent,
                status,
                duration_ms,
                confidence: 0,
                summary,
            },
        );
        self.events.emit(
            run_id,
            &BriefingEvent::PhaseComplete {
                phase,
                duration_ms,
                completed: usize::from(status == AgentStatus::Completed),
                failed: usize::from(status == AgentStatus::Failed),
                skipped: usize::from(status == AgentStatus::Skipped),
            },
        );

        if cancelled {
            return Err(BriefingError::Cancelled);
        }
        Ok(narrative)
    }

    /// Best-effort terminal bookkeeping for a run that hit a fatal error.
    fn fail_run(&self, run: &mut Run, err: &BriefingError, started: Instant) {
        let duration_ms = elapsed_ms(started);
        match run.fail(err.to_string(), duration_ms) {
            Ok(()) => {
                if let Err(e) = self.runs.update_run(run) {
                    warn!(run_id = %run.id, error = %e, "could not record run failure");
                }
            }
            Err(e) => warn!(run_id = %run.id, error = %e, "run already terminal"),
        }

        self.events.emit(
            &run.id,
            &BriefingEvent::BriefingComplete {
                run_id: run.id.clone(),
                status: RunStatus::Failed,
                action_count: 0,
                has_ai_summary: false,
                duration_ms,
            },
        );
        self.events.clear_run(&run.id);
    }
}

/// The phase-one forecast, if its agent completed with one.
fn demand_forecast(signals: &PhaseReport) -> Option<Arc<DemandForecast>> {
    signals
        .agents
        .iter()
        .filter(|r| r.is_completed() && r.agent_name == agent_names::DEMAND_FORECAST)
        .find_map(|r| match &r.data {
            AgentPayload::DemandForecast(forecast) => Some(Arc::new(forecast.clone())),
            _ => None,
        })
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_models::DemandDay;

    #[test]
    fn test_forecast_only_from_completed_agent() {
        let forecast = DemandForecast {
            days: vec![DemandDay {
                date: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
                expected_covers: 120,
                baseline_covers: 100,
            }],
        };
        let mut report = PhaseReport {
            phase: PhaseId::Signals,
            agents: vec![AgentRunResult::completed(
                agent_names::DEMAND_FORECAST,
                3,
                80,
                "120 covers",
                AgentPayload::DemandForecast(forecast.clone()),
            )],
            duration_ms: 3,
        };
        assert_eq!(demand_forecast(&report).as_deref(), Some(&forecast));

        report.agents[0] = AgentRunResult::failed(agent_names::DEMAND_FORECAST, 3, "no data");
        assert!(demand_forecast(&report).is_none());
    }

    #[test]
    fn test_request_builder() {
        let run_id = RunId::new();
        let request = BriefingRequest::new("harbour-st", NaiveDate::from_ymd_opt(2026, 10, 12).unwrap())
            .with_triggered_by("cron")
            .with_run_id(run_id.clone());
        assert_eq!(request.triggered_by.as_deref(), Some("cron"));
        assert_eq!(request.run_id, Some(run_id));
    }
}
