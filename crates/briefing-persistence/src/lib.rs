//! Persistence layer for briefing runs.
//!
//! Runs and their agent results are stored as JSON files, each written
//! atomically (temp file, then rename) so a crash mid-run leaves a partial
//! but readable trail:
//!
//! ```text
//! base_path/
//! └── runs/
//!     └── run-<uuid>/
//!         ├── run.json
//!         └── results/
//!             ├── 20261012T080000123-res-<uuid>.json
//!             └── ...
//! ```
//!
//! # Example
//!
//! ```no_run
//! use briefing_persistence::{RunRepository, RunStore};
//! use briefing_models::{Location, Run};
//! use chrono::NaiveDate;
//!
//! let store = RunStore::new("/var/lib/kitchen-briefing");
//! let location = Location::new("loc-1", "harbour-st", "Harbour St");
//! let run = Run::start(&location, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(), None);
//! store.create_run(&run).unwrap();
//! let loaded = store.load_run(&run.id).unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod repository;
pub mod result_store;
pub mod run_store;

pub use error::{PersistenceError, Result};
pub use repository::{AgentResultRepository, RunRepository};
pub use result_store::AgentResultStore;
pub use run_store::RunStore;
