//! RemoteStatusManager - the "working remotely today" flag.
//!
//! A remote participant gets no invitations until 23:59:59 of the current
//! day in the configured timezone. Expiry is lazy: `expire_stale` runs before
//! each invitee computation instead of on a timer.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::domain::foundation::{ErrorCode, ParticipantId, Timestamp};
use crate::domain::session::SessionError;
use crate::ports::{Clock, ParticipantRepository};

pub struct RemoteStatusManager {
    participants: Arc<dyn ParticipantRepository>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl RemoteStatusManager {
    pub fn new(participants: Arc<dyn ParticipantRepository>, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self {
            participants,
            clock,
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Marks the participant remote until the end of today. Returns the
    /// instant the status expires.
    ///
    /// # Errors
    ///
    /// - `ParticipantNotFound` if the participant is unknown
    pub async fn set_remote(&self, id: ParticipantId) -> Result<Timestamp, SessionError> {
        let now = self.clock.now();
        let until = now.end_of_day_in(self.timezone);

        self.participants
            .set_remote_until(id, until, now)
            .await
            .map_err(|e| match e.code {
                ErrorCode::ParticipantNotFound => SessionError::ParticipantNotFound(id),
                _ => e.into(),
            })?;

        tracing::debug!(participant_id = %id, until = %until.as_datetime(), "Participant marked remote");
        Ok(until)
    }

    /// Clears remote status. Returns whether the participant was remote.
    ///
    /// # Errors
    ///
    /// - `ParticipantNotFound` if the participant is unknown
    pub async fn clear_remote(&self, id: ParticipantId) -> Result<bool, SessionError> {
        let mut participant = self
            .participants
            .find_by_id(id)
            .await?
            .ok_or(SessionError::ParticipantNotFound(id))?;

        if !participant.is_remote_today() {
            return Ok(false);
        }

        participant.clear_remote(self.clock.now());
        self.participants.update(&participant).await?;
        tracing::debug!(participant_id = %id, "Remote status cleared");
        Ok(true)
    }

    /// Clears every remote status whose deadline has passed.
    pub async fn expire_stale(&self) -> Result<u64, SessionError> {
        let cleared = self
            .participants
            .clear_expired_remote(self.clock.now())
            .await?;
        if cleared > 0 {
            tracing::debug!(cleared, "Expired remote statuses");
        }
        Ok(cleared)
    }
}
