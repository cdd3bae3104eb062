//! Server module for managing HTTP server lifecycle
//!
//! This module handles startup (migrations, seed, store, credential strategy),
//! serving and graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::auth::Authenticator;
use crate::config::settings::Settings;
use crate::db::{Store, establish_sync_connection, run_migrations, seed_store};
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Runs until Ctrl+C or SIGTERM.
    ///
    /// 1. Validates the settings
    /// 2. Migrates and seeds the store when configured to
    /// 3. Opens the store and builds the configured credential strategy
    /// 4. Binds and serves with graceful shutdown
    /// 5. Closes the store
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = self.settings;
        settings.validate()?;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            "Application starting"
        );
        tracing::info!(
            path = %settings.database.sqlite_path(),
            max_connections = settings.database.max_connections,
            auto_migrate = settings.database.auto_migrate,
            seed_on_startup = settings.seed.on_startup,
            "Database configuration loaded"
        );
        tracing::info!(
            strategy = %settings.auth.strategy,
            cookie_secure = settings.auth.cookie_secure,
            "Auth configuration loaded"
        );

        if settings.seed.on_startup {
            seed_store(&settings.database, &settings.seed).await?;
        } else if settings.database.auto_migrate {
            let database = settings.database.clone();
            let applied = tokio::task::spawn_blocking(move || {
                let mut conn = establish_sync_connection(&database)?;
                run_migrations(&mut conn)
            })
            .await??;
            tracing::info!(applied = applied.len(), "Migrations applied");
        }

        let store = Store::open(&settings.database).await?;
        let auth = Authenticator::from_config(&settings.auth);
        let state = AppState::new(&store, auth, &settings.web.static_dir);
        let router = create_router(state);

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;
        tracing::info!(address = %address, static_dir = %settings.web.static_dir, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        store.close();
        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolves on the first of Ctrl+C or SIGTERM. A handler that cannot be
/// installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
