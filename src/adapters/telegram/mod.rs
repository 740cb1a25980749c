//! Telegram transport adapter.
//!
//! - `TelegramClient` - Bot API calls; implements the `Messenger` port
//! - `UpdateRouter` - inbound commands and button callbacks
//! - `TelegramPoller` - long-polling update source
//!
//! The webhook update source lives in the HTTP adapter.

mod client;
mod poller;
mod router;
mod types;

pub use client::TelegramClient;
pub use poller::TelegramPoller;
pub use router::{RouterServices, UpdateRouter};
pub use types::{CallbackQuery, Chat, Message, Update, User};
