//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build;

/// Read-only dashboard over batch processes and their run history
#[derive(Parser, Debug)]
#[command(name = "batch-dashboard")]
#[command(about = "Authenticated dashboard over batch process definitions and run history")]
#[command(long_about = "
batch-dashboard serves a small web UI and JSON API over a SQLite record store
of batch process definitions and their historical runs. Every page and API
route except the login page sits behind a credential cookie.

EXAMPLES:
    # Start the server (migrates and seeds an empty database first)
    batch-dashboard serve

    # Bind to all interfaces on port 8080
    batch-dashboard serve --host 0.0.0.0 --port 8080

    # Check configuration without starting the server
    batch-dashboard --env production serve --dry-run

    # Apply, preview or roll back migrations
    batch-dashboard migrate
    batch-dashboard migrate --dry-run
    batch-dashboard migrate --rollback 1

    # Seed an empty database from a custom dataset
    batch-dashboard seed --data-file ./my-data.json

    # Delete the database and start over (server must be stopped)
    batch-dashboard reset --yes
")]
#[command(version = build::PKG_VERSION, long_version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file layered above config/local.toml
    ///
    /// The file must exist and be in TOML format.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (DASHBOARD_APP_ENV)
    ///
    /// Selects config/{environment}.toml.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   batch-dashboard serve                            # Start with defaults
    ///   batch-dashboard serve --host 0.0.0.0 --port 80  # All interfaces, port 80
    ///   batch-dashboard serve --dry-run                  # Validate config only
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on (1-65535)
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override; wins over --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Database migration operations
    ///
    /// Examples:
    ///   batch-dashboard migrate                 # Apply all pending migrations
    ///   batch-dashboard migrate --dry-run       # List pending migrations
    ///   batch-dashboard migrate --rollback 1    # Revert the newest migration
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Number of migrations to revert (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
    /// Migrate, then seed the admin user and sample data into an empty database
    ///
    /// A database that already has a user is left untouched.
    Seed {
        /// JSON dataset to use instead of the bundled one
        #[arg(long, value_name = "FILE", value_parser = super::validation::validate_data_file_path)]
        data_file: Option<PathBuf>,
    },
    /// Delete the database file, then migrate and seed a fresh one
    ///
    /// The server must be stopped first.
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}
