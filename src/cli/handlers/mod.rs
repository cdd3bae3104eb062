//! Command handlers for CLI operations
//!
//! One handler per subcommand, each owning the merged settings.

pub mod migrate;
pub mod reset;
pub mod seed;
pub mod serve;

pub use migrate::MigrateCommandHandler;
pub use reset::ResetCommandHandler;
pub use seed::SeedCommandHandler;
pub use serve::ServeCommandHandler;
