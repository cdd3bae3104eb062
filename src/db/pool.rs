use std::path::Path;
use std::time::Duration;

use diesel::sqlite::SqliteConnection;
use diesel::{ConnectionError, ConnectionResult};
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};
use futures::FutureExt;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// SQLite driven through diesel's blocking driver on tokio's blocking pool.
pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;

/// bb8 keeps its state behind an `Arc`, so clones share one pool.
pub type AsyncDbPool = Pool<DbConnection>;

/// Process-lifetime handle to the record store.
///
/// Built once by [`Store::open`], cloned into the application state and
/// released with [`Store::close`] after the server stops.
#[derive(Clone)]
pub struct Store {
    pool: AsyncDbPool,
    path: String,
}

impl Store {
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        let path = config.sqlite_path().to_string();
        ensure_parent_dir(&path)?;

        let busy_timeout_ms = config.busy_timeout_ms;
        let mut manager_config = ManagerConfig::<DbConnection>::default();
        manager_config.custom_setup =
            Box::new(move |url| establish(url.to_string(), busy_timeout_ms).boxed());

        let manager =
            AsyncDieselConnectionManager::<DbConnection>::new_with_config(&path, manager_config);

        let pool = Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(config.min_connections))
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .build(manager)
            .await
            .map_err(|e| AppError::store("open pool", e))?;

        tracing::info!(
            path = %path,
            max_connections = config.max_connections,
            "Record store opened"
        );

        Ok(Self { pool, path })
    }

    pub fn pool(&self) -> &AsyncDbPool {
        &self.pool
    }

    /// Drops this handle's reference to the pool. Connections close once the
    /// last clone held by in-flight requests is gone.
    pub fn close(self) {
        let state = self.pool.state();
        tracing::info!(
            path = %self.path,
            connections = state.connections,
            idle = state.idle_connections,
            "Record store closed"
        );
    }
}

async fn establish(url: String, busy_timeout_ms: u32) -> ConnectionResult<DbConnection> {
    let mut conn = DbConnection::establish(&url).await?;
    conn.batch_execute(&connection_pragmas(busy_timeout_ms))
        .await
        .map_err(ConnectionError::CouldntSetupConfiguration)?;
    Ok(conn)
}

/// Per-connection settings; SQLite does not persist either of them.
pub(crate) fn connection_pragmas(busy_timeout_ms: u32) -> String {
    format!(
        "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
        busy_timeout_ms
    )
}

pub(crate) fn ensure_parent_dir(path: &str) -> AppResult<()> {
    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::store(
                "create database directory",
                format!("{}: {}", parent.display(), e),
            )
        })?;
    }
    Ok(())
}
