use diesel::prelude::*;
use serde::Deserialize;

use super::Process;

/// One historical execution of a [`Process`].
#[derive(Debug, Queryable, Selectable, Identifiable, Associations, Clone, PartialEq)]
#[diesel(table_name = crate::schema::batch_runs)]
#[diesel(belongs_to(Process))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Run {
    pub id: i32,
    pub process_id: i32,
    pub start_requested: Option<String>,
    pub started: Option<String>,
    pub completed: Option<String>,
    pub scheduled: bool,
    pub server: Option<String>,
    pub description: Option<String>,
    pub op_count: i32,
    pub failed: i32,
    pub failure_reason: Option<String>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::batch_runs)]
pub struct NewRun {
    pub process_id: i32,
    pub start_requested: Option<String>,
    pub started: Option<String>,
    pub completed: Option<String>,
    pub scheduled: bool,
    pub server: Option<String>,
    pub description: Option<String>,
    pub op_count: i32,
    pub failed: i32,
    pub failure_reason: Option<String>,
}

/// A run as it appears in the seed dataset, keyed by the owning process name.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedRun {
    pub process_name: String,
    #[serde(default)]
    pub start_requested: Option<String>,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(default)]
    pub completed: Option<String>,
    #[serde(default)]
    pub scheduled: bool,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ops: i32,
    #[serde(default)]
    pub failed: i32,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

impl SeedRun {
    pub fn into_new_run(self, process_id: i32) -> NewRun {
        NewRun {
            process_id,
            start_requested: self.start_requested,
            started: self.started,
            completed: self.completed,
            scheduled: self.scheduled,
            server: self.server,
            description: self.description,
            op_count: self.ops,
            failed: self.failed,
            failure_reason: self.failure_reason,
        }
    }
}
