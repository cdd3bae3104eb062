//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments sit above every configuration source: files, then
//! `DASHBOARD_*` variables, then the flags given on the command line.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, settings::Settings};

pub struct ConfigurationMerger {
    loader: ConfigLoader,
}

impl ConfigurationMerger {
    pub fn new(loader: ConfigLoader) -> Self {
        Self { loader }
    }

    /// Points the loader at `--config` and `--env` when given.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }
        Self::new(loader)
    }

    pub fn environment(&self) -> Environment {
        self.loader.environment()
    }

    /// Loads the file and environment layers, applies the CLI overrides and
    /// validates the result.
    pub fn load(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut settings = self.loader.load_unvalidated()?;
        Self::apply_overrides(&mut settings, cli);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_overrides(settings: &mut Settings, cli: &Cli) {
        if cli.verbose {
            settings.logger.level = "debug".to_string();
        } else if cli.quiet {
            settings.logger.level = "error".to_string();
        }

        match &cli.command {
            Some(Commands::Serve {
                host,
                port,
                log_level,
                ..
            }) => {
                if let Some(host) = host {
                    settings.server.host = host.clone();
                }
                if let Some(port) = port {
                    settings.server.port = *port;
                }
                // Command-specific level wins over --verbose/--quiet.
                if let Some(level) = log_level {
                    settings.logger.level = level.as_str().to_string();
                }
            }
            Some(Commands::Seed {
                data_file: Some(path),
            }) => {
                settings.seed.data_file = Some(path.display().to_string());
            }
            _ => {}
        }
    }
}
