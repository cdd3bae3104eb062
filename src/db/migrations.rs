use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::config::DatabaseConfig;
use crate::db::pool::{connection_pragmas, ensure_parent_dir};
use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Opens a blocking connection for maintenance work (migrations, seed, reset).
///
/// Also switches the file to WAL, which unlike the per-connection pragmas is
/// persisted in the database itself.
pub fn establish_sync_connection(config: &DatabaseConfig) -> AppResult<SqliteConnection> {
    let path = config.sqlite_path();
    ensure_parent_dir(path)?;

    let mut conn = SqliteConnection::establish(path)?;
    conn.batch_execute(&connection_pragmas(config.busy_timeout_ms))?;
    conn.batch_execute("PRAGMA journal_mode = WAL;")?;
    Ok(conn)
}

/// Applies every pending migration and returns the applied versions.
pub fn run_migrations(conn: &mut SqliteConnection) -> AppResult<Vec<String>> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| AppError::store("run pending migrations", e))?;
    Ok(applied.iter().map(|v| v.to_string()).collect())
}

pub fn pending_migrations(conn: &mut SqliteConnection) -> AppResult<Vec<String>> {
    let pending = conn
        .pending_migrations(MIGRATIONS)
        .map_err(|e| AppError::store("check pending migrations", e))?;
    Ok(pending.iter().map(|m| m.name().to_string()).collect())
}

/// Reverts up to `steps` migrations, newest first. Stops early once nothing
/// is left to revert.
pub fn revert_migrations(conn: &mut SqliteConnection, steps: u32) -> AppResult<Vec<String>> {
    let mut reverted = Vec::new();
    for _ in 0..steps {
        let applied = conn
            .applied_migrations()
            .map_err(|e| AppError::store("list applied migrations", e))?;
        if applied.is_empty() {
            break;
        }
        let version = conn
            .revert_last_migration(MIGRATIONS)
            .map_err(|e| AppError::store("revert migration", e))?;
        reverted.push(version.to_string());
    }
    Ok(reverted)
}
