use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::{DatabaseConfig, SeedConfig};
use crate::db::seed::{SeedOutcome, seed_store};
use crate::error::{AppError, AppResult};

/// Deletes the database file and its WAL companions, then migrates and seeds
/// a fresh one. The server must not be running against the same file.
pub async fn reset_database(database: &DatabaseConfig, seed: &SeedConfig) -> AppResult<SeedOutcome> {
    let path = PathBuf::from(database.sqlite_path());
    let mut removed = false;

    for suffix in ["", "-wal", "-shm"] {
        let mut target = path.clone().into_os_string();
        target.push(suffix);
        let target = PathBuf::from(target);

        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                tracing::info!(path = %target.display(), "Deleted database file");
                removed = true;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::store(
                    "delete database",
                    format!(
                        "Could not delete {}: {}. Make sure the server is stopped.",
                        target.display(),
                        e
                    ),
                ));
            }
        }
    }

    if !removed {
        tracing::info!(path = %path.display(), "No existing database found");
    }

    seed_store(database, seed).await
}
