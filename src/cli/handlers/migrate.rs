//! Migrate command handler
//!
//! Handles database migration operations including dry-run and rollback.

use crate::config::settings::Settings;
use crate::db::{establish_sync_connection, pending_migrations, revert_migrations, run_migrations};
use crate::error::AppResult;

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Applies pending migrations, or lists them (`dry_run`), or reverts the
    /// newest `rollback` ones.
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;

        if dry_run {
            let pending = self.with_connection(pending_migrations).await?;
            if pending.is_empty() {
                println!("✓ No pending migrations found - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for name in &pending {
                    println!("  - {}", name);
                }
                println!("\nRun without --dry-run to apply these migrations");
            }
            return Ok(());
        }

        if let Some(steps) = rollback {
            let reverted = self
                .with_connection(move |conn| revert_migrations(conn, steps))
                .await?;
            if reverted.is_empty() {
                println!("✓ Nothing to roll back");
            } else {
                println!("✓ Rolled back {} migration(s):", reverted.len());
                for version in &reverted {
                    println!("  - {}", version);
                }
            }
            return Ok(());
        }

        let applied = self.with_connection(run_migrations).await?;
        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }
        Ok(())
    }

    async fn with_connection<T, F>(&self, work: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut diesel::SqliteConnection) -> AppResult<T> + Send + 'static,
    {
        let database = self.config.database.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = establish_sync_connection(&database)?;
            work(&mut conn)
        })
        .await?
    }
}
