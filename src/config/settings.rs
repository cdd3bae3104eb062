//! Settings tree deserialized from TOML files and `DASHBOARD_*` variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "batch-dashboard".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "data/dashboard.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    8
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_busy_timeout() -> u32 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    "logs/dashboard.log".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

// ============================================================================
// Application / server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, suitable for `TcpListener::bind`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Database
// ============================================================================

/// SQLite record store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the database file, optionally written as `sqlite://path`.
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Milliseconds a connection waits on a locked database before failing.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u32,

    /// Run pending migrations when the server starts.
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl DatabaseConfig {
    /// The filesystem path of the database, with any `sqlite://` scheme removed.
    pub fn sqlite_path(&self) -> &str {
        self.url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))
            .unwrap_or(&self.url)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout_secs: default_connection_timeout(),
            busy_timeout_ms: default_busy_timeout(),
            auto_migrate: true,
        }
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// How a successful login is represented to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    /// Signed JWT carried in the `token` cookie.
    #[default]
    Token,
    /// Opaque handle in the `sid` cookie, resolved against server-held sessions.
    Session,
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialKind::Token => f.write_str("token"),
            CredentialKind::Session => f.write_str("session"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub strategy: CredentialKind,

    /// HS256 signing key. Required for the token strategy; keep it out of
    /// committed files and supply it through `DASHBOARD_AUTH__SECRET`.
    #[serde(default)]
    pub secret: String,

    /// Adds `Secure` to the credential cookie.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            strategy: CredentialKind::default(),
            secret: String::new(),
            cookie_secure: true,
        }
    }
}

// ============================================================================
// Static assets and seed data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebConfig {
    /// Directory holding `index.html`, `login.html` and their assets.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Seed an empty database when the server starts.
    #[serde(default = "default_true")]
    pub on_startup: bool,

    /// JSON dataset to load instead of the one compiled into the binary.
    #[serde(default)]
    pub data_file: Option<String>,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            on_startup: true,
            data_file: None,
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

// ============================================================================
// Logger
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            format: default_log_format(),
            colored: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default = "default_true")]
    pub append: bool,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            format: default_log_format(),
            append: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Converts the file representation into the runtime [`LoggerConfig`].
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig {
            enabled: self.console.enabled,
            format: parse_format("logger.console.format", &self.console.format)?,
            colored: self.console.colored,
        };
        let file = FileConfig {
            enabled: self.file.enabled,
            path: PathBuf::from(self.file.path),
            format: parse_format("logger.file.format", &self.file.format)?,
            append: self.file.append,
        };

        LoggerConfig::new(self.level, console, file)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

fn parse_format(field: &str, value: &str) -> Result<LogFormat, ConfigError> {
    value
        .parse::<LogFormat>()
        .map_err(|e| ConfigError::validation(field, e.to_string()))
}

// ============================================================================
// Root
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub seed: SeedConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_server_config() -> impl Strategy<Value = ServerConfig> {
        (
            prop_oneof![Just("127.0.0.1".to_string()), Just("0.0.0.0".to_string())],
            1u16..=65535,
        )
            .prop_map(|(host, port)| ServerConfig { host, port })
    }

    fn arb_auth_config() -> impl Strategy<Value = AuthConfig> {
        (
            prop_oneof![Just(CredentialKind::Token), Just(CredentialKind::Session)],
            "[A-Za-z0-9]{32,64}",
            any::<bool>(),
        )
            .prop_map(|(strategy, secret, cookie_secure)| AuthConfig {
                strategy,
                secret,
                cookie_secure,
            })
    }

    proptest! {
        #[test]
        fn prop_settings_survive_toml_round_trip(
            server in arb_server_config(),
            auth in arb_auth_config(),
        ) {
            let settings = Settings { server, auth, ..Settings::default() };
            let text = toml::to_string(&settings).unwrap();
            let parsed: Settings = toml::from_str(&text).unwrap();
            prop_assert_eq!(parsed, settings);
        }
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let parsed: Settings = toml::from_str("").unwrap();
        assert_eq!(parsed, Settings::default());
        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.auth.strategy, CredentialKind::Token);
        assert_eq!(parsed.seed.admin_username, "admin");
        assert_eq!(parsed.application.version, crate::pkg_version());
    }

    #[test]
    fn test_strategy_parses_lowercase_names() {
        let parsed: AuthConfig = toml::from_str("strategy = \"session\"").unwrap();
        assert_eq!(parsed.strategy, CredentialKind::Session);
        assert!(toml::from_str::<AuthConfig>("strategy = \"ldap\"").is_err());
    }

    #[test]
    fn test_sqlite_path_strips_scheme() {
        let mut db = DatabaseConfig::default();
        db.url = "sqlite://data/app.db".into();
        assert_eq!(db.sqlite_path(), "data/app.db");
        db.url = "sqlite:app.db".into();
        assert_eq!(db.sqlite_path(), "app.db");
        db.url = "/var/lib/app.db".into();
        assert_eq!(db.sqlite_path(), "/var/lib/app.db");
    }

    #[test]
    fn test_logger_settings_reject_unknown_format() {
        let mut settings = LoggerSettings::default();
        settings.file.format = "xml".into();
        let err = settings.into_logger_config().unwrap_err();
        assert!(err.to_string().contains("logger.file.format"));
    }
}
