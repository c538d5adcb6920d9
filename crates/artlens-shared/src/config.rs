//! Configuration management

use crate::constants::*;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// One base endpoint per logical service area.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesSettings {
    pub auth: ServiceEndpoint,
    pub media: ServiceEndpoint,
    pub notifications: ServiceEndpoint,
    pub generation: ServiceEndpoint,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceEndpoint {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl ServiceEndpoint {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageSettings {
    /// Directory for persisted partitions. `None` keeps everything in memory.
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    pub dir: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load `config/default`, then `config/{APP_ENV}`, then `ARTLENS__*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::load_from(Path::new("config"), &env)
    }

    pub fn load_from(dir: &Path, env: &str) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join(env)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let timeout = DEFAULT_TIMEOUT_SECONDS as i64;
        Config::builder()
            .set_default("services.auth.base_url", DEFAULT_AUTH_BASE_URL)?
            .set_default("services.auth.timeout_seconds", timeout)?
            .set_default("services.media.base_url", DEFAULT_MEDIA_BASE_URL)?
            .set_default("services.media.timeout_seconds", timeout)?
            .set_default("services.notifications.base_url", DEFAULT_NOTIFICATIONS_BASE_URL)?
            .set_default("services.notifications.timeout_seconds", timeout)?
            .set_default("services.generation.base_url", DEFAULT_GENERATION_BASE_URL)?
            .set_default(
                "services.generation.timeout_seconds",
                GENERATION_TIMEOUT_SECONDS as i64,
            )?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("logging.json", false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(dir.path(), "test").unwrap();

        assert_eq!(config.services.auth.base_url, DEFAULT_AUTH_BASE_URL);
        assert_eq!(config.services.media.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(
            config.services.generation.timeout(),
            Duration::from_secs(GENERATION_TIMEOUT_SECONDS)
        );
        assert!(config.storage.dir.is_none());
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_env_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[services.media]\nbase_url = \"http://media.local\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[services.media]\ntimeout_seconds = 5\n[storage]\ndir = \"/tmp/artlens\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path(), "staging").unwrap();

        assert_eq!(config.services.media.base_url, "http://media.local");
        assert_eq!(config.services.media.timeout_seconds, 5);
        assert_eq!(config.storage.dir.as_deref(), Some("/tmp/artlens"));
        // untouched areas keep their defaults
        assert_eq!(config.services.auth.base_url, DEFAULT_AUTH_BASE_URL);
    }
}
