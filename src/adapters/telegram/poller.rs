//! TelegramPoller - long-polling update source.
//!
//! Tracks the `getUpdates` offset so every update is handled once, and
//! backs off on transport errors. Stops when the watch channel flips to
//! `true`; a poll in flight is abandoned.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::ports::MessengerError;

use super::{TelegramClient, Update, UpdateRouter};

/// Pause after a failed poll that carries no retry hint.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub struct TelegramPoller {
    client: Arc<TelegramClient>,
    router: Arc<UpdateRouter>,
    timeout: Duration,
}

impl TelegramPoller {
    pub fn new(client: Arc<TelegramClient>, router: Arc<UpdateRouter>, timeout: Duration) -> Self {
        Self {
            client,
            router,
            timeout,
        }
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut offset = 0;
        tracing::info!(timeout_secs = self.timeout.as_secs(), "Telegram polling started");

        loop {
            let polled = tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                polled = self.client.get_updates(offset, self.timeout) => polled,
            };

            match polled {
                Ok(updates) => {
                    offset = next_offset(offset, &updates);
                    for update in updates {
                        self.router.handle(update).await;
                    }
                }
                Err(e) => {
                    let pause = backoff_for(&e);
                    tracing::warn!(error = %e, pause_secs = pause.as_secs(), "Polling failed");
                    tokio::select! {
                        _ = shutdown.changed() => {
                            if *shutdown.borrow() {
                                break;
                            }
                        }
                        _ = tokio::time::sleep(pause) => {}
                    }
                }
            }
        }

        tracing::info!("Telegram polling stopped");
    }
}

/// Offset that acknowledges every update in `updates`.
fn next_offset(current: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .map_or(current, |next| next.max(current))
}

fn backoff_for(error: &MessengerError) -> Duration {
    match error {
        MessengerError::RateLimited { retry_after_secs } => Duration::from_secs(*retry_after_secs),
        _ => ERROR_BACKOFF,
    }
}
