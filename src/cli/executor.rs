//! Command executor for dispatching CLI commands
//!
//! Loads the merged configuration, installs the logger and hands off to the
//! matching command handler. No subcommand means `serve`.

use super::config_merger::ConfigurationMerger;
use super::handlers::{
    MigrateCommandHandler, ResetCommandHandler, SeedCommandHandler, ServeCommandHandler,
};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::logger::init_logger;

pub async fn execute_command(cli: Cli) -> anyhow::Result<()> {
    let merger = ConfigurationMerger::from_cli(&cli);
    let settings = merger.load(&cli)?;

    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)?;
    tracing::info!(
        environment = %merger.environment(),
        version = %settings.application.version,
        "Configuration loaded"
    );

    dispatch(cli.command, settings).await
}

/// Runs `command` against already merged settings.
pub async fn dispatch(command: Option<Commands>, settings: Settings) -> anyhow::Result<()> {
    match command {
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(dry_run).await
        }
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(dry_run, rollback)
                .await?;
            Ok(())
        }
        Some(Commands::Seed { .. }) => {
            SeedCommandHandler::new(settings).execute().await?;
            Ok(())
        }
        Some(Commands::Reset { yes }) => {
            ResetCommandHandler::new(settings).execute(yes).await?;
            Ok(())
        }
    }
}
