use std::collections::HashMap;
use std::path::Path;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Deserialize;

use crate::config::{DatabaseConfig, SeedConfig};
use crate::db::migrations::{establish_sync_connection, run_migrations};
use crate::error::{AppError, AppResult};
use crate::models::{NewProcess, NewUser, SeedRun};
use crate::utils::password::hash_password;

const BUNDLED_DATASET: &str = include_str!("../../seed/seed-data.json");

/// Sample processes and runs. Runs reference their process by name.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedDataset {
    #[serde(default)]
    pub processes: Vec<NewProcess>,
    #[serde(default)]
    pub runs: Vec<SeedRun>,
}

impl SeedDataset {
    /// The dataset compiled into the binary from `seed/seed-data.json`.
    pub fn bundled() -> AppResult<Self> {
        Self::parse(BUNDLED_DATASET, "bundled seed data")
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AppError::BadRequest {
            message: format!("Cannot read seed file {}: {}", path.display(), e),
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// `data_file` when given, the bundled dataset otherwise.
    pub fn load(data_file: Option<&str>) -> AppResult<Self> {
        match data_file {
            Some(path) => Self::from_file(Path::new(path)),
            None => Self::bundled(),
        }
    }

    fn parse(text: &str, origin: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(|e| AppError::BadRequest {
            message: format!("Invalid seed data in {}: {}", origin, e),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

impl From<&SeedConfig> for AdminAccount {
    fn from(config: &SeedConfig) -> Self {
        Self {
            username: config.admin_username.clone(),
            password: config.admin_password.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already had users; nothing was written.
    Skipped { existing_users: i64 },
    Seeded {
        processes: usize,
        runs: usize,
        orphan_runs: usize,
    },
}

/// Populates an empty store with the admin account and `dataset`.
///
/// Guarded by the user count: a store that already has any user is left
/// untouched, so running this twice never duplicates the admin. Everything is
/// written in one immediate transaction.
pub fn seed_database(
    conn: &mut SqliteConnection,
    admin: &AdminAccount,
    dataset: &SeedDataset,
) -> AppResult<SeedOutcome> {
    use crate::schema::{batch_processes, batch_runs, users};

    // Hash outside the write lock; argon2 is deliberately slow.
    let password_hash = hash_password(&admin.password)?;

    conn.immediate_transaction::<_, AppError, _>(|conn| {
        let existing_users: i64 = users::table.count().get_result(conn)?;
        if existing_users > 0 {
            return Ok(SeedOutcome::Skipped { existing_users });
        }

        diesel::insert_into(users::table)
            .values(NewUser {
                username: &admin.username,
                password_hash: &password_hash,
            })
            .execute(conn)?;

        let mut ids: HashMap<&str, i32> = HashMap::with_capacity(dataset.processes.len());
        for process in &dataset.processes {
            // A savepoint per process, so one bad row does not undo the rest.
            let inserted = conn.transaction::<i32, diesel::result::Error, _>(|conn| {
                diesel::insert_into(batch_processes::table)
                    .values(process)
                    .returning(batch_processes::id)
                    .get_result(conn)
            });
            match inserted {
                Ok(process_id) => {
                    ids.insert(process.name.as_str(), process_id);
                }
                Err(e) => {
                    tracing::warn!(name = %process.name, error = %e, "Seed process rejected, skipped");
                }
            }
        }

        let mut runs = 0;
        let mut orphan_runs = 0;
        for run in &dataset.runs {
            let Some(&process_id) = ids.get(run.process_name.as_str()) else {
                tracing::warn!(process_name = %run.process_name, "Seed run references unknown process, skipped");
                orphan_runs += 1;
                continue;
            };
            diesel::insert_into(batch_runs::table)
                .values(run.clone().into_new_run(process_id))
                .execute(conn)?;
            runs += 1;
        }

        Ok(SeedOutcome::Seeded {
            processes: ids.len(),
            runs,
            orphan_runs,
        })
    })
}

/// Migrates the configured database and seeds it, on a blocking thread.
pub async fn seed_store(database: &DatabaseConfig, seed: &SeedConfig) -> AppResult<SeedOutcome> {
    let database = database.clone();
    let admin = AdminAccount::from(seed);
    let dataset = SeedDataset::load(seed.data_file.as_deref())?;

    let outcome = tokio::task::spawn_blocking(move || {
        let mut conn = establish_sync_connection(&database)?;
        run_migrations(&mut conn)?;
        seed_database(&mut conn, &admin, &dataset)
    })
    .await??;

    match &outcome {
        SeedOutcome::Skipped { existing_users } => {
            tracing::info!(existing_users, "Database already seeded")
        }
        SeedOutcome::Seeded {
            processes,
            runs,
            orphan_runs,
        } => tracing::info!(processes, runs, orphan_runs, "Database seeded"),
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Process, Run};
    use tempfile::TempDir;

    fn migrated(dir: &TempDir) -> SqliteConnection {
        let config = DatabaseConfig {
            url: dir.path().join("seed.sqlite").display().to_string(),
            ..DatabaseConfig::default()
        };
        let mut conn = establish_sync_connection(&config).unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    fn admin() -> AdminAccount {
        AdminAccount {
            username: "admin".into(),
            password: "admin123".into(),
        }
    }

    #[test]
    fn test_bundled_dataset_is_consistent() {
        let dataset = SeedDataset::bundled().unwrap();
        assert!(!dataset.processes.is_empty());
        assert!(
            dataset
                .runs
                .iter()
                .all(|r| dataset.processes.iter().any(|p| p.name == r.process_name))
        );
    }

    #[test]
    fn test_second_seed_is_a_no_op() {
        use crate::schema::users;
        let dir = TempDir::new().unwrap();
        let mut conn = migrated(&dir);
        let dataset = SeedDataset::bundled().unwrap();

        let first = seed_database(&mut conn, &admin(), &dataset).unwrap();
        assert!(matches!(first, SeedOutcome::Seeded { orphan_runs: 0, .. }));

        let second = seed_database(&mut conn, &admin(), &dataset).unwrap();
        assert_eq!(second, SeedOutcome::Skipped { existing_users: 1 });

        let admins: i64 = users::table
            .filter(users::username.eq("admin"))
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(admins, 1);
    }

    #[test]
    fn test_orphan_runs_are_skipped() {
        use crate::schema::batch_runs;
        let dir = TempDir::new().unwrap();
        let mut conn = migrated(&dir);
        let dataset: SeedDataset = serde_json::from_str(
            r#"{
                "processes": [{ "name": "Only", "description": "single" }],
                "runs": [
                    { "process_name": "Only", "started": "2025-01-02T00:00:00", "ops": 3 },
                    { "process_name": "Ghost", "started": "2025-01-01T00:00:00" }
                ]
            }"#,
        )
        .unwrap();

        let outcome = seed_database(&mut conn, &admin(), &dataset).unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Seeded {
                processes: 1,
                runs: 1,
                orphan_runs: 1
            }
        );

        let stored: Vec<Run> = batch_runs::table
            .select(Run::as_select())
            .load(&mut conn)
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].op_count, 3);
        assert_eq!(stored[0].failed, 0);
        let process: Process = crate::schema::batch_processes::table
            .select(Process::as_select())
            .first(&mut conn)
            .unwrap();
        assert_eq!(process.description.as_deref(), Some("single"));
        assert_eq!(process.cron_expr, None);
    }

    #[test]
    fn test_duplicate_process_is_skipped_not_fatal() {
        use crate::schema::batch_processes;
        let dir = TempDir::new().unwrap();
        let mut conn = migrated(&dir);
        let dataset: SeedDataset = serde_json::from_str(
            r#"{
                "processes": [
                    { "name": "Dup", "description": "first" },
                    { "name": "Dup", "description": "second" },
                    { "name": "Other" }
                ],
                "runs": [
                    { "process_name": "Dup", "started": "2025-01-02T00:00:00" },
                    { "process_name": "Other", "started": "2025-01-03T00:00:00" }
                ]
            }"#,
        )
        .unwrap();

        let outcome = seed_database(&mut conn, &admin(), &dataset).unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Seeded {
                processes: 2,
                runs: 2,
                orphan_runs: 0
            }
        );

        let stored: Vec<Process> = batch_processes::table
            .select(Process::as_select())
            .order(batch_processes::id.asc())
            .load(&mut conn)
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "Dup");
        assert_eq!(stored[0].description.as_deref(), Some("first"));
        assert_eq!(stored[1].name, "Other");
    }

    #[test]
    fn test_invalid_seed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = SeedDataset::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid seed data"));
    }
}
