//! Phase scheduler for the weekly kitchen briefing.
//!
//! [`BriefingService`] runs the fixed phase graph for one location and
//! week:
//!
//! 1. demand forecast, temperature anomalies, waste risk
//! 2. recipe suggestions, HACCP compliance, allergen check
//! 3. rotation fill, fed the demand forecast from phase 1
//! 4. optional narrative
//!
//! Agents inside a phase run concurrently; phases run strictly in order.
//! Each result is persisted as it lands and progress is broadcast on the
//! service's own [`briefing_events::EventBus`].

pub mod config;
pub mod error;
pub mod location;
pub mod service;

pub use config::BriefingConfig;
pub use error::{BriefingError, Result};
pub use location::{LocationDirectory, StaticLocations};
pub use service::{BriefingRequest, BriefingService};
