use crate::error::AppResult;
use crate::models::{Process, Run};
use crate::repositories::{ProcessRepository, RunRepository};

/// Read-only projections of processes and their run history.
#[derive(Clone)]
pub struct ProcessService {
    processes: ProcessRepository,
    runs: RunRepository,
}

impl ProcessService {
    pub fn new(processes: ProcessRepository, runs: RunRepository) -> Self {
        Self { processes, runs }
    }

    /// Every process, or only those matching `query` when it has any
    /// non-blank text. No match is an empty list.
    pub async fn list_processes(&self, query: Option<&str>) -> AppResult<Vec<Process>> {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(text) => self.processes.search(text).await,
            None => self.processes.list().await,
        }
    }

    /// Runs of the process identified by the raw path segment.
    ///
    /// An identifier that is not an integer, or that names no process,
    /// yields an empty history rather than an error.
    pub async fn list_runs(&self, raw_id: &str) -> AppResult<Vec<Run>> {
        match raw_id.trim().parse::<i32>() {
            Ok(id) => self.runs.list_for_process(id).await,
            Err(_) => {
                tracing::debug!(raw_id, "Non-numeric process id, returning empty history");
                Ok(Vec::new())
            }
        }
    }
}
