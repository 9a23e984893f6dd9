//! Agent adapter - the failure-isolation boundary.
//!
//! Each invocation runs on its own tokio task. The adapter waits for the
//! first of: the task settling, the caller's cancellation token, or the
//! phase deadline. Errors, panics, cancellation and timeouts all come back
//! as a `failed` [`AgentRunResult`]; nothing propagates to the caller.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use briefing_models::{AgentContext, AgentRunResult};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::agent::{Agent, AgentOutput, DependentAgent};
use crate::error::Result;

/// Limits shared by every invocation in one phase.
#[derive(Debug, Clone)]
pub struct InvocationScope {
    cancel: CancellationToken,
    deadline: Instant,
    timeout: Duration,
}

impl InvocationScope {
    /// A scope that expires `timeout` from now or when `cancel` fires.
    pub fn new(cancel: CancellationToken, timeout: Duration) -> Self {
        Self {
            cancel,
            deadline: Instant::now() + timeout,
            timeout,
        }
    }

    /// Returns true once the caller cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Runs a context-only agent and always returns a well-formed result.
pub async fn invoke(
    name: &str,
    agent: Arc<dyn Agent>,
    ctx: Arc<AgentContext>,
    scope: &InvocationScope,
) -> AgentRunResult {
    supervise(name, scope, async move { agent.analyze(&ctx).await }).await
}

/// Runs an agent that consumes an upstream value.
///
/// `input` of `None` is passed through as the explicit "no data" signal.
pub async fn invoke_dependent<I>(
    name: &str,
    agent: Arc<dyn DependentAgent<I>>,
    ctx: Arc<AgentContext>,
    input: Option<Arc<I>>,
    scope: &InvocationScope,
) -> AgentRunResult
where
    I: Send + Sync + 'static,
{
    supervise(name, scope, async move {
        agent.analyze(&ctx, input.as_deref()).await
    })
    .await
}

async fn supervise<F>(name: &str, scope: &InvocationScope, analysis: F) -> AgentRunResult
where
    F: Future<Output = Result<AgentOutput>> + Send + 'static,
{
    let started = Instant::now();
    if scope.is_cancelled() {
        return AgentRunResult::failed(name, 0, "cancelled");
    }

    let mut task = tokio::spawn(analysis);

    let outcome = tokio::select! {
        biased;
        joined = &mut task => match joined {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) if e.is_panic() => Err(format!("agent panicked: {}", panic_message(e.into_panic()))),
            Err(e) => Err(format!("agent task aborted: {}", e)),
        },
        _ = scope.cancel.cancelled() => {
            task.abort();
            Err("cancelled".to_string())
        }
        _ = tokio::time::sleep_until(scope.deadline) => {
            task.abort();
            Err(format!("timed out after {}s", scope.timeout.as_secs_f64()))
        }
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(output) => {
            let result = output.into_result(name, duration_ms);
            debug!(agent = %name, status = %result.status, duration_ms, "agent settled");
            result
        }
        Err(message) => {
            warn!(agent = %name, error = %message, duration_ms, "agent failed");
            AgentRunResult::failed(name, duration_ms, message)
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::from_fn;
    use crate::error::AgentError;
    use async_trait::async_trait;
    use briefing_models::{AgentPayload, AgentStatus, DemandForecast, Location};
    use chrono::NaiveDate;

    fn ctx() -> Arc<AgentContext> {
        let location = Location::new("loc-1", "harbour-st", "Harbour St");
        Arc::new(AgentContext::for_week(
            &location,
            NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
        ))
    }

    fn scope() -> InvocationScope {
        InvocationScope::new(CancellationToken::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_successful_agent() {
        let agent: Arc<dyn Agent> = Arc::new(from_fn(|ctx: AgentContext| async move {
            Ok(AgentOutput::completed(
                format!("forecast for {}", ctx.location_slug),
                80,
                AgentPayload::DemandForecast(DemandForecast::default()),
            ))
        }));

        let result = invoke("demand_forecast", agent, ctx(), &scope()).await;

        assert_eq!(result.status, AgentStatus::Completed);
        assert_eq!(result.result_summary, "forecast for harbour-st");
        assert_eq!(result.confidence, 80);
    }

    #[tokio::test]
    async fn test_error_becomes_failed_result() {
        let agent: Arc<dyn Agent> = Arc::new(from_fn(|_| async {
            Err(AgentError::Analysis("sales history unavailable".into()))
        }));

        let result = invoke("demand_forecast", agent, ctx(), &scope()).await;

        assert_eq!(result.status, AgentStatus::Failed);
        assert_eq!(result.confidence, 0);
        assert_eq!(result.result_summary, "analysis failed: sales history unavailable");
    }

    #[tokio::test]
    async fn test_panic_becomes_failed_result() {
        let agent: Arc<dyn Agent> = Arc::new(from_fn(|_| async {
            if true {
                panic!("index out of bounds");
            }
            Ok(AgentOutput::skipped("unreachable"))
        }));

        let result = invoke("waste_risk", agent, ctx(), &scope()).await;

        assert_eq!(result.status, AgentStatus::Failed);
        assert_eq!(result.confidence, 0);
        assert!(result.result_summary.contains("index out of bounds"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_becomes_failed_result() {
        let agent: Arc<dyn Agent> = Arc::new(from_fn(|_| async {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok(AgentOutput::skipped("too late"))
        }));
        let scope = InvocationScope::new(CancellationToken::new(), Duration::from_secs(2));

        let result = invoke("temperature_anomaly", agent, ctx(), &scope).await;

        assert_eq!(result.status, AgentStatus::Failed);
        assert!(result.result_summary.starts_with("timed out"));
    }

    #[tokio::test]
    async fn test_cancellation_becomes_failed_result() {
        let token = CancellationToken::new();
        let scope = InvocationScope::new(token.clone(), Duration::from_secs(60));
        let agent: Arc<dyn Agent> = Arc::new(from_fn(|_| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(AgentOutput::skipped("too late"))
        }));

        let trigger = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        let result = invoke("waste_risk", agent, ctx(), &scope).await;
        trigger.await.unwrap();

        assert_eq!(result.status, AgentStatus::Failed);
        assert_eq!(result.result_summary, "cancelled");
    }

    struct CountingRotation;

    #[async_trait]
    impl DependentAgent<DemandForecast> for CountingRotation {
        async fn analyze(
            &self,
            _ctx: &AgentContext,
            input: Option<&DemandForecast>,
        ) -> Result<AgentOutput> {
            match input {
                Some(forecast) => Ok(AgentOutput::completed(
                    format!("{} days forecast", forecast.days.len()),
                    70,
                    AgentPayload::Empty,
                )),
                None => Ok(AgentOutput::skipped("no demand forecast")),
            }
        }
    }

    #[tokio::test]
    async fn test_dependent_agent_receives_no_data_signal() {
        let agent: Arc<dyn DependentAgent<DemandForecast>> = Arc::new(CountingRotation);

        let result = invoke_dependent("rotation_fill", agent, ctx(), None, &scope()).await;

        assert_eq!(result.status, AgentStatus::Skipped);
        assert_eq!(result.result_summary, "no demand forecast");
    }

    #[tokio::test]
    async fn test_dependent_agent_receives_value() {
        let agent: Arc<dyn DependentAgent<DemandForecast>> = Arc::new(CountingRotation);
        let forecast = Arc::new(DemandForecast::default());

        let result =
            invoke_dependent("rotation_fill", agent, ctx(), Some(forecast), &scope()).await;

        assert_eq!(result.status, AgentStatus::Completed);
        assert_eq!(result.result_summary, "0 days forecast");
    }
}
