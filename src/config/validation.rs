//! Range and consistency checks run after the settings are deserialized.

use crate::config::error::ConfigError;
use crate::config::settings::{
    AuthConfig, CredentialKind, DatabaseConfig, LoggerSettings, SeedConfig, ServerConfig,
    Settings, WebConfig,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Shortest accepted HS256 key, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host must not be empty.",
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535.",
            ));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sqlite_path().trim().is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database path is required.",
            ));
        }
        if self.sqlite_path() == ":memory:" {
            return Err(ConfigError::validation(
                "database.url",
                "In-memory databases are not shared between pooled connections; use a file path.",
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }
        if self.connection_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout_secs",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy == CredentialKind::Token && self.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::validation(
                "auth.secret",
                format!(
                    "The token strategy needs a signing secret of at least {} bytes. \
                     Set DASHBOARD_AUTH__SECRET.",
                    MIN_SECRET_LEN
                ),
            ));
        }
        Ok(())
    }
}

impl WebConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.static_dir.trim().is_empty() {
            return Err(ConfigError::validation(
                "web.static_dir",
                "Static asset directory must not be empty.",
            ));
        }
        Ok(())
    }
}

impl SeedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_username.is_empty() {
            return Err(ConfigError::validation(
                "seed.admin_username",
                "Admin username must not be empty.",
            ));
        }
        if self.admin_password.is_empty() {
            return Err(ConfigError::validation(
                "seed.admin_password",
                "Admin password must not be empty.",
            ));
        }
        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid values are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }
        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "Log file path must not be empty when file logging is enabled.",
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// Validates every section, stopping at the first failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.web.validate()?;
        self.seed.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
