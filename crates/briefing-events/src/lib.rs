//! Per-run publish/subscribe for live briefing progress.
//!
//! The [`EventBus`] keeps, for each run id, the callbacks currently watching
//! that run. Emitting is synchronous fan-out to whatever is registered at
//! that moment; with nobody registered it does nothing. The pipeline never
//! depends on a subscriber being present.
//!
//! # Example
//!
//! ```no_run
//! use briefing_events::EventBus;
//! use briefing_models::{BriefingEvent, PhaseId, RunId};
//!
//! let bus = EventBus::new();
//! let run_id = RunId::new();
//!
//! let sub = bus.register(&run_id, |event| println!("{}", event.kind()));
//! bus.emit(&run_id, &BriefingEvent::AgentStart {
//!     phase: PhaseId::Signals,
//!     agent: "waste_risk".into(),
//! });
//! bus.unregister(&run_id, &sub);
//! ```

pub mod bus;

pub use bus::{EventBus, EventCallback};
