use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "DASHBOARD_CONFIG_DIR";
const CONFIG_FILE_ENV: &str = "DASHBOARD_CONFIG_FILE";
const DEFAULT_CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "DASHBOARD";
const ENV_SEPARATOR: &str = "__";

/// Builds [`Settings`] from the layered sources described in [`crate::config`].
///
/// `default.toml` is optional: every field has a serde default, so a bare
/// binary with only `DASHBOARD_AUTH__SECRET` set still starts.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Reads `DASHBOARD_CONFIG_DIR`, `DASHBOARD_CONFIG_FILE` and `DASHBOARD_APP_ENV`.
    pub fn new() -> Self {
        Self {
            config_dir: std::env::var(CONFIG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file: std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from),
            environment: AppEnvironment::from_env(),
        }
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// An explicit file layered above `local.toml`; it must exist.
    pub fn with_config_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config_file = Some(file.into());
        self
    }

    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads and validates.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads without validating, so CLI overrides can be applied first.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        self.build_config()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let mut builder = Config::builder();

        builder = Self::add_file_source(builder, &self.config_dir.join("default.toml"), false)?;
        builder = Self::add_file_source(
            builder,
            &self
                .config_dir
                .join(format!("{}.toml", self.environment.as_str())),
            false,
        )?;
        builder = Self::add_file_source(builder, &self.config_dir.join("local.toml"), false)?;

        if let Some(file) = &self.config_file {
            builder = Self::add_file_source(builder, file, true)?;
        }

        // DASHBOARD_SERVER__PORT -> server.port
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        builder.build().map_err(ConfigError::from)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.is_file() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }
        let name = path.to_str().ok_or_else(|| {
            ConfigError::ParseError(format!("Non UTF-8 config path: {}", path.display()))
        })?;
        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{ENV_MUTEX, EnvGuard};
    use super::*;
    use crate::config::CredentialKind;
    use std::fs;
    use tempfile::TempDir;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn clean_env() -> EnvGuard {
        let mut env = EnvGuard::default();
        for key in [
            CONFIG_DIR_ENV,
            CONFIG_FILE_ENV,
            AppEnvironment::ENV_VAR,
            "DASHBOARD_SERVER__PORT",
            "DASHBOARD_AUTH__SECRET",
            "DASHBOARD_AUTH__STRATEGY",
        ] {
            env.remove(key);
        }
        env
    }

    #[test]
    fn test_reads_location_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut env = clean_env();
        env.set(CONFIG_DIR_ENV, "/etc/dashboard");
        env.set(AppEnvironment::ENV_VAR, "prod");

        let loader = ConfigLoader::new();
        assert_eq!(loader.config_dir(), Path::new("/etc/dashboard"));
        assert_eq!(loader.environment(), AppEnvironment::Production);
    }

    #[test]
    fn test_layers_apply_in_priority_order() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _env = clean_env();
        let dir = config_dir(&[
            (
                "default.toml",
                &format!("[server]\nport = 3000\nhost = \"0.0.0.0\"\n[auth]\nsecret = \"{SECRET}\"\n"),
            ),
            ("test.toml", "[server]\nport = 4000\n"),
            ("local.toml", "[web]\nstatic_dir = \"assets\"\n"),
        ]);

        let settings = ConfigLoader::new()
            .with_config_dir(dir.path())
            .with_environment(AppEnvironment::Test)
            .load()
            .unwrap();

        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.web.static_dir, "assets");
    }

    #[test]
    fn test_env_vars_override_files() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut env = clean_env();
        let dir = config_dir(&[("default.toml", "[server]\nport = 3000\n")]);
        env.set("DASHBOARD_SERVER__PORT", "9090");
        env.set("DASHBOARD_AUTH__STRATEGY", "session");

        let settings = ConfigLoader::new()
            .with_config_dir(dir.path())
            .load()
            .unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.auth.strategy, CredentialKind::Session);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _env = clean_env();
        let dir = config_dir(&[]);

        let err = ConfigLoader::new()
            .with_config_dir(dir.path())
            .with_config_file(dir.path().join("missing.toml"))
            .load()
            .unwrap_err();

        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_explicit_file_overrides_layers() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _env = clean_env();
        let dir = config_dir(&[
            ("default.toml", "[server]\nport = 3000\n"),
            ("ops.toml", &format!("[server]\nport = 7000\n[auth]\nsecret = \"{SECRET}\"\n")),
        ]);

        let settings = ConfigLoader::new()
            .with_config_dir(dir.path())
            .with_config_file(dir.path().join("ops.toml"))
            .load()
            .unwrap();

        assert_eq!(settings.server.port, 7000);
    }

    #[test]
    fn test_missing_secret_fails_validation_only_when_validated() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _env = clean_env();
        let dir = config_dir(&[]);
        let loader = ConfigLoader::new().with_config_dir(dir.path());

        assert!(loader.load_unvalidated().is_ok());
        assert!(matches!(
            loader.load().unwrap_err(),
            ConfigError::ValidationError { .. }
        ));
    }
}
