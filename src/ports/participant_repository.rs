//! Participant repository port.
//!
//! Defines the contract for persisting the participant directory.
//!
//! # Design
//!
//! - **Policy-free**: the hidden-user rule is applied by the directory
//!   service before records reach the repository
//! - **Bulk expiry**: remote status is expired in one statement rather than
//!   participant by participant

use crate::domain::foundation::{DomainError, ParticipantId, Timestamp};
use crate::domain::participant::Participant;
use async_trait::async_trait;

/// Repository port for participants.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Insert a new participant.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the id is already taken
    /// - `DatabaseError` on persistence failure
    async fn create(&self, participant: &Participant) -> Result<(), DomainError>;

    /// Find a participant by id. Returns `None` if unknown.
    async fn find_by_id(&self, id: ParticipantId) -> Result<Option<Participant>, DomainError>;

    /// Every registered participant, ordered by username then first name.
    async fn find_all(&self) -> Result<Vec<Participant>, DomainError>;

    /// Overwrite an existing participant.
    ///
    /// # Errors
    ///
    /// - `ParticipantNotFound` if the participant doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, participant: &Participant) -> Result<(), DomainError>;

    /// Remove a participant.
    ///
    /// # Errors
    ///
    /// - `ParticipantNotFound` if the participant doesn't exist
    async fn delete(&self, id: ParticipantId) -> Result<(), DomainError>;

    /// Mark a participant remote until `until`.
    ///
    /// # Errors
    ///
    /// - `ParticipantNotFound` if the participant doesn't exist
    async fn set_remote_until(
        &self,
        id: ParticipantId,
        until: Timestamp,
        now: Timestamp,
    ) -> Result<(), DomainError>;

    /// Clear remote status for everyone whose `remote_until` is before `now`.
    ///
    /// Returns the number of participants cleared.
    async fn clear_expired_remote(&self, now: Timestamp) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ParticipantRepository) {}
    }
}
