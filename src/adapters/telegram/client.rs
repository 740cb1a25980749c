//! Telegram Bot API client.
//!
//! Implements the `Messenger` port over HTTPS with `reqwest`, and exposes
//! `getUpdates` for the long-polling source.
//!
//! # Security
//!
//! - The bot token is part of every request URL, so it is held as a
//!   `secrecy::SecretString` and URLs are stripped from transport errors
//!   before they are logged

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::TelegramConfig;
use crate::domain::notification::OutboundMessage;
use crate::ports::{MessageRef, Messenger, MessengerError};

use super::types::{
    AnswerCallbackQueryRequest, ApiResponse, EditMessageTextRequest, GetUpdatesRequest, Message,
    ReplyMarkup, SendMessageRequest, Update,
};

/// Extra time allowed on top of the long-poll timeout before the HTTP
/// request itself is abandoned.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Timeout for every call other than `getUpdates`.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Telegram Bot API client.
pub struct TelegramClient {
    http_client: reqwest::Client,
    api_base_url: String,
    bot_token: SecretString,
}

impl TelegramClient {
    pub fn new(bot_token: SecretString, api_base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    pub fn from_config(config: &TelegramConfig) -> Self {
        Self::new(config.bot_token.clone(), config.api_base_url.clone())
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout: Duration,
    ) -> Result<Vec<Update>, MessengerError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message", "callback_query"],
        };
        self.call("getUpdates", &request, timeout + POLL_GRACE).await
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base_url,
            self.bot_token.expose_secret(),
            method
        )
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, MessengerError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| MessengerError::network(e.without_url().to_string()))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| MessengerError::network(e.without_url().to_string()))?;

        into_result(method, envelope)
    }
}

/// Unwraps the Bot API envelope into a result.
fn into_result<T>(method: &str, envelope: ApiResponse<T>) -> Result<T, MessengerError> {
    if envelope.ok {
        if let Some(result) = envelope.result {
            return Ok(result);
        }
    }

    let code = envelope.error_code.unwrap_or_default();
    let description = envelope
        .description
        .unwrap_or_else(|| "no description".to_string());

    if let Some(retry_after_secs) = envelope.parameters.and_then(|p| p.retry_after) {
        tracing::warn!(method, retry_after_secs, "Telegram rate limit hit");
        return Err(MessengerError::RateLimited { retry_after_secs });
    }

    tracing::debug!(method, code, description = %description, "Telegram rejected request");
    Err(MessengerError::Rejected { code, description })
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send(&self, message: &OutboundMessage) -> Result<MessageRef, MessengerError> {
        let request = SendMessageRequest {
            chat_id: message.recipient.as_i64(),
            text: &message.text,
            parse_mode: Some("Markdown"),
            reply_markup: ReplyMarkup::from_markup(&message.markup),
        };
        let sent: Message = self.call("sendMessage", &request, REQUEST_TIMEOUT).await?;
        Ok(MessageRef::new(sent.chat.id, sent.message_id))
    }

    async fn edit(&self, message: MessageRef, text: &str) -> Result<(), MessengerError> {
        let request = EditMessageTextRequest {
            chat_id: message.chat_id,
            message_id: message.message_id,
            text,
        };
        // Returns the edited Message, or `true` for inline messages.
        let _: serde_json::Value = self
            .call("editMessageText", &request, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), MessengerError> {
        let request = AnswerCallbackQueryRequest {
            callback_query_id: callback_id,
            text,
        };
        let _: bool = self
            .call("answerCallbackQuery", &request, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }
}
