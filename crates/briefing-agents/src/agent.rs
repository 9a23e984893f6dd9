//! The uniform agent contract.

use std::future::Future;

use async_trait::async_trait;
use briefing_models::{AgentContext, AgentPayload, AgentRunResult};

use crate::error::Result;

/// What an agent hands back when it does not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    /// The analysis ran.
    Completed {
        summary: String,
        /// 0-100, clamped on conversion.
        confidence: u8,
        data: AgentPayload,
    },
    /// The agent had nothing to work with.
    Skipped { reason: String },
}

impl AgentOutput {
    /// A completed analysis.
    pub fn completed(summary: impl Into<String>, confidence: u8, data: AgentPayload) -> Self {
        AgentOutput::Completed {
            summary: summary.into(),
            confidence,
            data,
        }
    }

    /// A skipped analysis.
    pub fn skipped(reason: impl Into<String>) -> Self {
        AgentOutput::Skipped {
            reason: reason.into(),
        }
    }

    /// Converts into the uniform result shape.
    pub fn into_result(self, agent_name: &str, duration_ms: u64) -> AgentRunResult {
        match self {
            AgentOutput::Completed {
                summary,
                confidence,
                data,
            } => AgentRunResult::completed(agent_name, duration_ms, confidence, summary, data),
            AgentOutput::Skipped { reason } => {
                AgentRunResult::skipped(agent_name, duration_ms, reason)
            }
        }
    }
}

/// An analysis task that only needs the shared run context.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Runs the analysis for one location and week.
    async fn analyze(&self, ctx: &AgentContext) -> Result<AgentOutput>;
}

/// An analysis task that also consumes a value produced by an earlier
/// phase.
///
/// `input` is `None` when the producing agent did not complete; the agent
/// should degrade (typically [`AgentOutput::skipped`]) rather than fail.
#[async_trait]
pub trait DependentAgent<I: Send + Sync>: Send + Sync {
    /// Runs the analysis with the upstream value, if any.
    async fn analyze(&self, ctx: &AgentContext, input: Option<&I>) -> Result<AgentOutput>;
}

/// Agent backed by an async closure.
pub struct FnAgent<F>(F);

/// Wraps an async closure as an [`Agent`].
pub fn from_fn<F, Fut>(f: F) -> FnAgent<F>
where
    F: Fn(AgentContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<AgentOutput>> + Send,
{
    FnAgent(f)
}

#[async_trait]
impl<F, Fut> Agent for FnAgent<F>
where
    F: Fn(AgentContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<AgentOutput>> + Send,
{
    async fn analyze(&self, ctx: &AgentContext) -> Result<AgentOutput> {
        (self.0)(ctx.clone()).await
    }
}
