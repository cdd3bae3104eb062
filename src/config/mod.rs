//! Layered configuration for the dashboard.
//!
//! Sources, lowest priority first:
//! 1. serde defaults on every settings struct
//! 2. `default.toml`
//! 3. `{environment}.toml`
//! 4. `local.toml`
//! 5. an explicit file (`--config` or `DASHBOARD_CONFIG_FILE`)
//! 6. `DASHBOARD_*` environment variables, `__` separating nested keys

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, AuthConfig, ConsoleSettings, CredentialKind, DatabaseConfig, FileSettings,
    LoggerSettings, SeedConfig, ServerConfig, Settings, WebConfig,
};
