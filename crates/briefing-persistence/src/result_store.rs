//! File-backed, append-only agent result store.

use std::fs;
use std::path::PathBuf;

use briefing_models::{AgentResultRecord, RunId};
use tracing::{debug, warn};

use crate::atomic::{read_json, write_json_atomic};
use crate::error::{PersistenceError, Result};
use crate::repository::AgentResultRepository;

/// Stores each agent result as its own file under
/// `runs/{run_id}/results/`.
#[derive(Debug, Clone)]
pub struct AgentResultStore {
    base_path: PathBuf,
}

impl AgentResultStore {
    /// Creates a new AgentResultStore with the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn results_dir(&self, run_id: &RunId) -> PathBuf {
        self.base_path
            .join("runs")
            .join(run_id.as_str())
            .join("results")
    }
}

impl AgentResultRepository for AgentResultStore {
    fn append_result(&self, record: &AgentResultRecord) -> Result<()> {
        let file_name = format!(
            "{}-{}.json",
            record.recorded_at.format("%Y%m%dT%H%M%S%f"),
            record.id
        );
        let path = self.results_dir(&record.run_id).join(file_name);
        if path.exists() {
            return Err(PersistenceError::AlreadyExists {
                kind: "agent result".to_string(),
                id: record.id.to_string(),
            });
        }
        write_json_atomic(&path, record)?;
        debug!(
            run_id = %record.run_id,
            agent = %record.result.agent_name,
            status = %record.result.status,
            "agent result recorded"
        );
        Ok(())
    }

    fn list_results(&self, run_id: &RunId) -> Result<Vec<AgentResultRecord>> {
        let dir = self.results_dir(run_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::ReadError {
            path: dir.clone(),
            source,
        })?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match read_json::<AgentResultRecord>(&path) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable agent result"),
            }
        }

        records.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_models::{AgentPayload, AgentRunResult, AgentStatus, ComplianceHealth};
    use tempfile::tempdir;

    #[test]
    fn test_append_and_list() {
        let dir = tempdir().unwrap();
        let store = AgentResultStore::new(dir.path());
        let run_id = RunId::new();

        let first = AgentResultRecord::new(
            run_id.clone(),
            AgentRunResult::completed(
                "haccp_compliance",
                40,
                80,
                "Health score 64",
                AgentPayload::ComplianceHealth(ComplianceHealth {
                    health_score: 64,
                    open_issues: vec![],
                }),
            ),
        );
        let mut second = AgentResultRecord::new(
            run_id.clone(),
            AgentRunResult::failed("waste_risk", 5, "feed missing"),
        );
        second.recorded_at = first.recorded_at + chrono::Duration::milliseconds(1);

        store.append_result(&second).unwrap();
        store.append_result(&first).unwrap();

        let records = store.list_results(&run_id).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].result.agent_name, "haccp_compliance");
        assert_eq!(records[1].result.status, AgentStatus::Failed);
        assert_eq!(records[0], first);
    }

    #[test]
    fn test_results_are_scoped_to_run() {
        let dir = tempdir().unwrap();
        let store = AgentResultStore::new(dir.path());
        let run_a = RunId::new();
        let run_b = RunId::new();

        store
            .append_result(&AgentResultRecord::new(
                run_a.clone(),
                AgentRunResult::skipped("rotation_fill", 0, "no forecast"),
            ))
            .unwrap();

        assert_eq!(store.list_results(&run_a).unwrap().len(), 1);
        assert!(store.list_results(&run_b).unwrap().is_empty());
    }

    #[test]
    fn test_append_same_record_twice_fails() {
        let dir = tempdir().unwrap();
        let store = AgentResultStore::new(dir.path());
        let record = AgentResultRecord::new(
            RunId::new(),
            AgentRunResult::skipped("rotation_fill", 0, "no forecast"),
        );

        store.append_result(&record).unwrap();
        let result = store.append_result(&record);
        assert!(matches!(result, Err(PersistenceError::AlreadyExists { .. })));
    }
}
