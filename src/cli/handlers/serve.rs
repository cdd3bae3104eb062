//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::settings::Settings;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.validate_only()
        } else {
            Server::new(self.config).run().await
        }
    }

    /// Validates the configuration and prints what the server would do.
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Database file: {}", self.config.database.sqlite_path());
        println!("✓ Credential strategy: {}", self.config.auth.strategy);
        println!("✓ Static assets: {}", self.config.web.static_dir);
        if self.config.seed.on_startup {
            println!("✓ An empty database will be seeded on startup");
        }
        println!("Dry run completed successfully");
        Ok(())
    }
}
