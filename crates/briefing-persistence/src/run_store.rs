//! File-backed run store.

use std::fs;
use std::path::PathBuf;

use briefing_models::{Run, RunId};
use tracing::{debug, warn};

use crate::atomic::{ensure_dir, read_json, write_json_atomic};
use crate::error::{PersistenceError, Result};
use crate::repository::RunRepository;

const RUN_FILE: &str = "run.json";

/// Stores each run as `runs/{run_id}/run.json` under a base path.
#[derive(Debug, Clone)]
pub struct RunStore {
    base_path: PathBuf,
}

impl RunStore {
    /// Creates a new RunStore with the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn runs_dir(&self) -> PathBuf {
        self.base_path.join("runs")
    }

    fn run_path(&self, id: &RunId) -> PathBuf {
        self.runs_dir().join(id.as_str()).join(RUN_FILE)
    }

    fn not_found(id: &RunId) -> PersistenceError {
        PersistenceError::NotFound {
            kind: "run".to_string(),
            id: id.to_string(),
        }
    }
}

impl RunRepository for RunStore {
    fn create_run(&self, run: &Run) -> Result<()> {
        let path = self.run_path(&run.id);
        if path.exists() {
            return Err(PersistenceError::AlreadyExists {
                kind: "run".to_string(),
                id: run.id.to_string(),
            });
        }
        write_json_atomic(&path, run)?;
        debug!(run_id = %run.id, "run created");
        Ok(())
    }

    fn update_run(&self, run: &Run) -> Result<()> {
        let path = self.run_path(&run.id);
        if !path.exists() {
            return Err(Self::not_found(&run.id));
        }
        write_json_atomic(&path, run)?;
        debug!(run_id = %run.id, status = %run.status, "run updated");
        Ok(())
    }

    fn load_run(&self, id: &RunId) -> Result<Run> {
        let path = self.run_path(id);
        if !path.exists() {
            return Err(Self::not_found(id));
        }
        read_json(&path)
    }

    fn list_runs(&self) -> Result<Vec<Run>> {
        let dir = self.runs_dir();
        ensure_dir(&dir)?;

        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::ReadError {
            path: dir.clone(),
            source,
        })?;

        let mut runs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path().join(RUN_FILE);
            if !path.exists() {
                continue;
            }
            match read_json::<Run>(&path) {
                Ok(run) => runs.push(run),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable run"),
            }
        }

        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }
}
