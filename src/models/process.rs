use diesel::prelude::*;
use serde::Deserialize;

/// A named batch job definition.
///
/// The scheduling columns (`schedule`, `cron_expr`, `next_scheduled_run`) are
/// descriptive metadata; nothing in this crate evaluates them.
#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::batch_processes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Process {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub last_run_at: Option<String>,
    pub last_run_status: Option<String>,
    pub next_scheduled_run: Option<String>,
    pub schedule: Option<String>,
    pub cron_expr: Option<String>,
}

#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::batch_processes)]
pub struct NewProcess {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_run_at: Option<String>,
    #[serde(default)]
    pub last_run_status: Option<String>,
    #[serde(default)]
    pub next_scheduled_run: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub cron_expr: Option<String>,
}
