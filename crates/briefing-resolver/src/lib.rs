//! Conflict resolution for the weekly kitchen briefing.
//!
//! Turns the heterogeneous results of one run into a single action list.
//! Resolution is a pure function of its input: an ordered list of rules is
//! applied to every completed result, then the items are stably sorted by
//! priority so that HIGH precedes MEDIUM precedes LOW and rule order is
//! kept within a tier.

pub mod resolver;
pub mod rules;
pub mod summary;

pub use resolver::{ConflictResolver, Finding, Rule};
pub use rules::ResolverThresholds;
pub use summary::algorithmic_summary;
