//! Agent adapter contract for the weekly kitchen briefing.
//!
//! Every analysis task is an [`Agent`] (or, for the one agent that consumes
//! another agent's output, a [`DependentAgent`]). The [`adapter`] module is
//! the pipeline's failure-isolation boundary: whatever the agent does
//! (return an error, panic, hang past the phase deadline, get cancelled)
//! the caller receives a well-formed [`AgentRunResult`].
//!
//! [`AgentRunResult`]: briefing_models::AgentRunResult

pub mod adapter;
pub mod agent;
pub mod error;
pub mod feed;
pub mod roster;

pub use adapter::{invoke, invoke_dependent, InvocationScope};
pub use agent::{from_fn, Agent, AgentOutput, DependentAgent, FnAgent};
pub use error::{AgentError, Result};
pub use feed::{FeedAgent, FeedRotationAgent, FeedSource};
pub use roster::AgentRoster;
