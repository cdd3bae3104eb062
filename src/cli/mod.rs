//! Command-line interface: argument parsing, configuration merging and the
//! `serve`/`migrate`/`seed`/`reset` command handlers.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};
