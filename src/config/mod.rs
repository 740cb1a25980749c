//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SMOKE_BREAK` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use smoke_break::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod directory;
mod error;
mod schedule;
mod server;
mod telegram;

pub use database::DatabaseConfig;
pub use directory::DirectoryConfig;
pub use error::{ConfigError, ValidationError};
pub use schedule::ScheduleConfig;
pub use server::{Environment, ServerConfig};
pub use telegram::{TelegramConfig, UpdateMode};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server (webhook and health)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL; in-memory storage when absent
    pub database: Option<DatabaseConfig>,

    pub telegram: TelegramConfig,

    /// Timezone, working hours and session timing
    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub directory: DirectoryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SMOKE_BREAK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SMOKE_BREAK__TELEGRAM__BOT_TOKEN=...` -> `telegram.bot_token = ...`
    /// - `SMOKE_BREAK__SCHEDULE__TIMEZONE=Europe/Moscow` -> `schedule.timezone = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SMOKE_BREAK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.telegram.validate()?;
        self.schedule.validate()?;
        self.directory.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "SMOKE_BREAK__TELEGRAM__BOT_TOKEN",
        "SMOKE_BREAK__TELEGRAM__MODE",
        "SMOKE_BREAK__TELEGRAM__WEBHOOK_SECRET",
        "SMOKE_BREAK__DATABASE__URL",
        "SMOKE_BREAK__SCHEDULE__TIMEZONE",
        "SMOKE_BREAK__SCHEDULE__STALE_AFTER_SECS",
        "SMOKE_BREAK__SERVER__PORT",
        "SMOKE_BREAK__SERVER__ENVIRONMENT",
    ];

    fn set_minimal_env() {
        env::set_var("SMOKE_BREAK__TELEGRAM__BOT_TOKEN", "123456:test-token");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_minimal_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.telegram.bot_token.expose_secret(), "123456:test-token");
        assert_eq!(config.telegram.mode, UpdateMode::Polling);
        assert!(config.database.is_none());
        assert_eq!(config.schedule.stale_after_secs, 900);
        assert_eq!(config.directory.hidden_username, "eyerise");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_token_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("SMOKE_BREAK__DATABASE__URL", "postgresql://bot@localhost/smoke"),
            ("SMOKE_BREAK__SCHEDULE__TIMEZONE", "Europe/Moscow"),
            ("SMOKE_BREAK__SCHEDULE__STALE_AFTER_SECS", "600"),
            ("SMOKE_BREAK__SERVER__PORT", "3000"),
        ])
        .unwrap();

        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgresql://bot@localhost/smoke")
        );
        assert_eq!(config.schedule.timezone().unwrap(), chrono_tz::Europe::Moscow);
        assert_eq!(config.schedule.stale_after_secs, 600);
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_webhook_mode_without_secret_is_invalid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("SMOKE_BREAK__TELEGRAM__MODE", "webhook")]).unwrap();

        assert_eq!(config.telegram.mode, UpdateMode::Webhook);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("SMOKE_BREAK__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
    }
}
