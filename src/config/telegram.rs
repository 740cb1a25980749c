//! Telegram Bot API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// How updates reach the bot
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Long-poll `getUpdates`
    #[default]
    Polling,
    /// Telegram pushes updates to `POST /telegram/webhook`
    Webhook,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Token issued by @BotFather
    pub bot_token: SecretString,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default)]
    pub mode: UpdateMode,

    /// Long-poll timeout in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Value Telegram sends in `X-Telegram-Bot-Api-Secret-Token`
    pub webhook_secret: Option<SecretString>,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: SecretString::new(bot_token.into()),
            api_base_url: default_api_base_url(),
            mode: UpdateMode::default(),
            poll_timeout_secs: default_poll_timeout(),
            webhook_secret: None,
        }
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// Validate Telegram configuration
    ///
    /// Webhook mode requires a secret so forged updates can be rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
        }
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://") {
            return Err(ValidationError::InvalidApiBaseUrl);
        }
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 300 {
            return Err(ValidationError::InvalidPollTimeout);
        }
        match (&self.mode, &self.webhook_secret) {
            (UpdateMode::Webhook, None) => {
                return Err(ValidationError::MissingRequired("TELEGRAM__WEBHOOK_SECRET"))
            }
            (_, Some(secret)) if !is_valid_secret(secret.expose_secret()) => {
                return Err(ValidationError::InvalidWebhookSecret)
            }
            _ => {}
        }
        Ok(())
    }
}

fn is_valid_secret(secret: &str) -> bool {
    (1..=256).contains(&secret.len())
        && secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    60
}
