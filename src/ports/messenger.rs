//! Messenger port for the chat transport.
//!
//! Defines the outbound side of the messaging platform: sending messages,
//! editing previously sent ones, and acknowledging button presses.
//!
//! # Design
//!
//! - **Transport agnostic**: messages are [`OutboundMessage`] values; the
//!   adapter maps markup onto platform keyboards
//! - **Per-call failures**: every call fails independently so fan-out can
//!   isolate failing recipients

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::OutboundMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Handle of a message already delivered to a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

impl MessageRef {
    pub fn new(chat_id: i64, message_id: i64) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver a message to its recipient.
    async fn send(&self, message: &OutboundMessage) -> Result<MessageRef, MessengerError>;

    /// Replace the text of a delivered message. Any buttons are removed.
    async fn edit(&self, message: MessageRef, text: &str) -> Result<(), MessengerError>;

    /// Acknowledge a button press, showing `text` to the presser.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), MessengerError>;
}

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessengerError {
    /// The request never reached the platform or the response was unreadable.
    #[error("network error: {0}")]
    Network(String),

    /// The platform rejected the request (blocked bot, unknown chat, ...).
    #[error("rejected by platform ({code}): {description}")]
    Rejected { code: i64, description: String },

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl MessengerError {
    pub fn network(message: impl Into<String>) -> Self {
        MessengerError::Network(message.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MessengerError::Network(_) | MessengerError::RateLimited { .. }
        )
    }
}

impl From<MessengerError> for DomainError {
    fn from(err: MessengerError) -> Self {
        DomainError::new(ErrorCode::TransportError, err.to_string())
    }
}
