//! Core data models for the weekly kitchen briefing.
//!
//! This crate provides the types shared by every stage of the briefing
//! pipeline: runs, per-agent results, typed agent payloads, action items,
//! the assembled briefing and the progress events streamed to observers.

pub mod action;
pub mod agent;
pub mod briefing;
pub mod event;
pub mod ids;
pub mod location;
pub mod payload;
pub mod phase;
pub mod run;

pub use action::{ActionItem, Priority};
pub use agent::{AgentContext, AgentResultRecord, AgentRunResult, AgentStatus};
pub use briefing::{Briefing, PhaseReport};
pub use event::BriefingEvent;
pub use ids::{ResultId, RunId, SubscriptionId};
pub use location::Location;
pub use payload::{
    AgentPayload, AllergenExposure, AnomalySeverity, ComplianceHealth, DemandDay, DemandForecast,
    GuestProfile, PlannedDish, RecipeSuggestion, RecipeSuggestions, RotationFill,
    TemperatureAnomalies, TemperatureAnomaly, WasteRisk, WasteRiskItem,
};
pub use phase::{agent_names, PhaseId};
pub use run::{Run, RunStatus, RunTransitionError};
