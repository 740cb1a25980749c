//! ParticipantDirectory - the user directory service.
//!
//! Every inbound interaction registers (or refreshes) its sender here. The
//! hidden-participant policy is evaluated on every write.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, ParticipantId};
use crate::domain::participant::{HiddenParticipantPolicy, Participant, ParticipantProfile, Roster};
use crate::domain::session::SessionError;
use crate::ports::{Clock, ParticipantRepository};

pub struct ParticipantDirectory {
    repository: Arc<dyn ParticipantRepository>,
    policy: HiddenParticipantPolicy,
    clock: Arc<dyn Clock>,
}

impl ParticipantDirectory {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        policy: HiddenParticipantPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            policy,
            clock,
        }
    }

    /// Creates or refreshes a participant from the platform profile.
    pub async fn register(
        &self,
        id: ParticipantId,
        profile: ParticipantProfile,
    ) -> Result<Participant, SessionError> {
        let now = self.clock.now();

        if let Some(mut existing) = self.repository.find_by_id(id).await? {
            existing.apply_profile(profile, now);
            self.policy.apply(&mut existing);
            self.repository.update(&existing).await?;
            return Ok(existing);
        }

        let mut participant = Participant::new(id, profile.clone(), now);
        self.policy.apply(&mut participant);

        match self.repository.create(&participant).await {
            Ok(()) => {
                tracing::info!(
                    participant_id = %id,
                    hidden = participant.is_hidden(),
                    "Participant registered"
                );
                Ok(participant)
            }
            // Lost a race with a concurrent first interaction; refresh instead.
            Err(e) if e.code == ErrorCode::ValidationFailed => {
                let mut existing = self
                    .repository
                    .find_by_id(id)
                    .await?
                    .ok_or(SessionError::ParticipantNotFound(id))?;
                existing.apply_profile(profile, now);
                self.policy.apply(&mut existing);
                self.repository.update(&existing).await?;
                Ok(existing)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find(&self, id: ParticipantId) -> Result<Option<Participant>, SessionError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// # Errors
    ///
    /// - `ParticipantNotFound` if the participant was never registered
    pub async fn get(&self, id: ParticipantId) -> Result<Participant, SessionError> {
        self.find(id)
            .await?
            .ok_or(SessionError::ParticipantNotFound(id))
    }

    /// Snapshot of every participant, for rendering and notification.
    pub async fn roster(&self) -> Result<Roster, SessionError> {
        Ok(Roster::new(self.repository.find_all().await?))
    }

    /// Removes a participant from the directory.
    pub async fn remove(&self, id: ParticipantId) -> Result<(), SessionError> {
        self.repository.delete(id).await.map_err(|e| {
            if e.code == ErrorCode::ParticipantNotFound {
                SessionError::ParticipantNotFound(id)
            } else {
                e.into()
            }
        })
    }
}
