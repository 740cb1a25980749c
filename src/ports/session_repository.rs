//! Session repository port.
//!
//! Defines the contract for persisting Session aggregates.
//!
//! # Design
//!
//! - **Single active session**: `create_active` is the only way to open a
//!   session and must check-and-insert atomically
//! - **Conditional close**: `close` only transitions rows that are still
//!   active, so a close racing another close is detected rather than
//!   applied twice

use crate::domain::foundation::{DomainError, ParticipantId, SessionId, SessionStatus, Timestamp};
use crate::domain::session::Session;
use async_trait::async_trait;

/// Repository port for Session aggregate persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Open a new active session. The store generates the id.
    ///
    /// # Errors
    ///
    /// - `SessionAlreadyActive` if any session is currently active
    /// - `DatabaseError` on persistence failure
    async fn create_active(
        &self,
        initiator: ParticipantId,
        at: Timestamp,
    ) -> Result<Session, DomainError>;

    /// Find a session by its id. Returns `None` if not found.
    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, DomainError>;

    /// The currently active session, if any.
    async fn find_active(&self) -> Result<Option<Session>, DomainError>;

    /// Overwrite an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Move an active session to a terminal `status`.
    ///
    /// Returns the closed session when this call performed the transition,
    /// `None` when the session was unknown or already closed.
    async fn close(
        &self,
        id: SessionId,
        status: SessionStatus,
        at: Timestamp,
    ) -> Result<Option<Session>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
