//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid Telegram API base URL")]
    InvalidApiBaseUrl,

    #[error("Long-poll timeout must be between 1 and 300 seconds")]
    InvalidPollTimeout,

    #[error("Webhook secret may only contain A-Z, a-z, 0-9, '_' and '-' (1-256 chars)")]
    InvalidWebhookSecret,

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Working hours must satisfy start < end <= 24")]
    InvalidWorkingHours,

    #[error("Invalid duration for {0}")]
    InvalidDuration(&'static str),

    #[error("Hidden username cannot be empty")]
    EmptyHiddenUsername,
}
