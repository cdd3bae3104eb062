//! Process and run projections.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{Process, Run};

/// Query string of `GET /api/processes`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProcessQuery {
    /// Case-insensitive substring matched against name or description.
    pub q: Option<String>,
}

/// A batch process as listed on the dashboard.
///
/// Timestamps are passed through exactly as stored.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProcessResponse {
    pub id: i32,
    #[schema(example = "NightlyLedgerClose")]
    pub name: String,
    pub description: Option<String>,
    pub last_run_at: Option<String>,
    /// "Completed", "Failed", "Executing…" or "Not available".
    pub last_run_status: Option<String>,
    pub next_scheduled_run: Option<String>,
    #[schema(example = "Enabled")]
    pub schedule: Option<String>,
    #[schema(example = "0 2 * * *")]
    pub cron_expr: Option<String>,
}

impl From<Process> for ProcessResponse {
    fn from(process: Process) -> Self {
        Self {
            id: process.id,
            name: process.name,
            description: process.description,
            last_run_at: process.last_run_at,
            last_run_status: process.last_run_status,
            next_scheduled_run: process.next_scheduled_run,
            schedule: process.schedule,
            cron_expr: process.cron_expr,
        }
    }
}

/// One entry of a process history.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RunResponse {
    pub id: i32,
    pub process_id: i32,
    pub start_requested: Option<String>,
    pub started: Option<String>,
    pub completed: Option<String>,
    pub scheduled: bool,
    pub server: Option<String>,
    pub description: Option<String>,
    pub ops: i32,
    pub failed: i32,
    pub failure_reason: Option<String>,
}

impl From<Run> for RunResponse {
    fn from(run: Run) -> Self {
        Self {
            id: run.id,
            process_id: run.process_id,
            start_requested: run.start_requested,
            started: run.started,
            completed: run.completed,
            scheduled: run.scheduled,
            server: run.server,
            description: run.description,
            ops: run.op_count,
            failed: run.failed,
            failure_reason: run.failure_reason,
        }
    }
}
