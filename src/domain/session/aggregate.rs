//! Session aggregate entity.
//!
//! A session is one proposed smoke break, from the moment someone starts it
//! until it is completed (timeout or explicit) or cancelled by its initiator.
//!
//! # Ownership
//!
//! Sessions do not own their responses; those live in the response store
//! keyed by `(session_id, participant_id)`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::SessionError;
use crate::domain::foundation::{
    ParticipantId, SessionId, SessionStatus, StateMachine, Timestamp,
};

/// Session aggregate.
///
/// # Invariants
///
/// - `completed_at` is set iff the status is terminal
/// - terminal sessions never change again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    initiator_id: ParticipantId,
    status: SessionStatus,
    created_at: Timestamp,
    completed_at: Option<Timestamp>,
}

impl Session {
    /// Creates a freshly started session. Ids are generated by the store.
    pub fn open(id: SessionId, initiator_id: ParticipantId, created_at: Timestamp) -> Self {
        Self {
            id,
            initiator_id,
            status: SessionStatus::Active,
            created_at,
            completed_at: None,
        }
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        initiator_id: ParticipantId,
        status: SessionStatus,
        created_at: Timestamp,
        completed_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            initiator_id,
            status,
            created_at,
            completed_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn initiator_id(&self) -> ParticipantId {
        self.initiator_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_open()
    }

    pub fn is_initiator(&self, participant: ParticipantId) -> bool {
        self.initiator_id == participant
    }

    /// True when the session has been open strictly longer than `threshold`.
    pub fn is_stale(&self, now: &Timestamp, threshold: Duration) -> bool {
        match chrono::Duration::from_std(threshold) {
            Ok(threshold) => now.duration_since(&self.created_at) > threshold,
            Err(_) => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Guards
    // ─────────────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// - `NotActive` if the session is already closed
    pub fn ensure_active(&self) -> Result<(), SessionError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(SessionError::NotActive(self.id))
        }
    }

    /// # Errors
    ///
    /// - `NotInitiator` if `participant` did not start the session
    pub fn authorize_cancel(&self, participant: ParticipantId) -> Result<(), SessionError> {
        if self.is_initiator(participant) {
            Ok(())
        } else {
            Err(SessionError::NotInitiator(self.id))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Closes the session with a terminal status.
    ///
    /// # Errors
    ///
    /// - `NotActive` if the session is already terminal
    pub fn close(&mut self, target: SessionStatus, at: Timestamp) -> Result<(), SessionError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| SessionError::NotActive(self.id))?;
        self.completed_at = Some(at);
        Ok(())
    }

    pub fn complete(&mut self, at: Timestamp) -> Result<(), SessionError> {
        self.close(SessionStatus::Completed, at)
    }

    pub fn cancel(&mut self, at: Timestamp) -> Result<(), SessionError> {
        self.close(SessionStatus::Cancelled, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs)
    }

    fn test_session() -> Session {
        Session::open(SessionId::new(1), ParticipantId::new(10), ts(1_000))
    }

    #[test]
    fn new_session_is_active() {
        let session = test_session();
        assert_eq!(session.status(), SessionStatus::Active);
        assert!(session.completed_at().is_none());
    }

    #[test]
    fn complete_sets_completion_time() {
        let mut session = test_session();
        session.complete(ts(2_000)).unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.completed_at(), Some(&ts(2_000)));
    }

    #[test]
    fn closing_twice_fails() {
        let mut session = test_session();
        session.cancel(ts(1_500)).unwrap();

        assert_eq!(
            session.complete(ts(1_600)),
            Err(SessionError::NotActive(SessionId::new(1)))
        );
        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert_eq!(session.completed_at(), Some(&ts(1_500)));
    }

    #[test]
    fn close_rejects_active_target() {
        let mut session = test_session();
        assert!(session.close(SessionStatus::Active, ts(1_100)).is_err());
        assert!(session.is_active());
    }

    #[test]
    fn only_initiator_may_cancel() {
        let session = test_session();
        assert!(session.authorize_cancel(ParticipantId::new(10)).is_ok());
        assert_eq!(
            session.authorize_cancel(ParticipantId::new(11)),
            Err(SessionError::NotInitiator(SessionId::new(1)))
        );
    }

    #[test]
    fn stale_is_strictly_greater_than_threshold() {
        let session = test_session();
        let fifteen = Duration::from_secs(900);

        assert!(!session.is_stale(&ts(1_900), fifteen));
        assert!(session.is_stale(&ts(1_901), fifteen));
    }
}
