//! SessionReaper - background auto-completion of stale sessions.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 60s | How often to look for a stale session |
//! | `stale_after` | 15min | Age at which the reaper completes a session |
//! | `recovery_after` | 1h | Age used by the one-shot pass at startup |
//!
//! ## Graceful Shutdown
//!
//! The loop exits when the watch channel flips to `true`. A tick in progress
//! finishes first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::session::SessionEvent;

use super::{NotificationService, SessionCoordinator};

#[derive(Debug, Clone)]
pub struct SessionReaperConfig {
    pub interval: Duration,
    pub stale_after: Duration,
    pub recovery_after: Duration,
}

impl Default for SessionReaperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            stale_after: Duration::from_secs(15 * 60),
            recovery_after: Duration::from_secs(60 * 60),
        }
    }
}

impl SessionReaperConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn with_recovery_after(mut self, recovery_after: Duration) -> Self {
        self.recovery_after = recovery_after;
        self
    }
}

pub struct SessionReaper {
    coordinator: Arc<SessionCoordinator>,
    notifier: Arc<NotificationService>,
    config: SessionReaperConfig,
}

impl SessionReaper {
    pub fn new(
        coordinator: Arc<SessionCoordinator>,
        notifier: Arc<NotificationService>,
        config: SessionReaperConfig,
    ) -> Self {
        Self {
            coordinator,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &SessionReaperConfig {
        &self.config
    }

    /// Run the reaper loop until the shutdown signal is received.
    ///
    /// Failures are logged and the next tick tries again.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            stale_after_secs = self.config.stale_after.as_secs(),
            "Session reaper started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Session reaper stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// One reaper pass. Returns the auto-completion event, if any.
    pub async fn tick(&self) -> Option<SessionEvent> {
        match self.coordinator.auto_complete_stale(self.config.stale_after).await {
            Ok(Some(event)) => {
                self.notifier.dispatch(&event).await;
                Some(event)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "Reaper pass failed");
                None
            }
        }
    }

    /// One-shot pass at startup for a session left open by a previous run.
    ///
    /// The closure is logged, not announced.
    pub async fn recover(&self) -> Option<SessionEvent> {
        match self
            .coordinator
            .auto_complete_stale(self.config.recovery_after)
            .await
        {
            Ok(Some(event)) => {
                tracing::warn!(
                    session_id = %event.session().id(),
                    "Recovered session left open by a previous run"
                );
                Some(event)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "Startup recovery failed");
                None
            }
        }
    }
}
