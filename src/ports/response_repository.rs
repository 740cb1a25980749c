//! Response repository port.

use crate::domain::foundation::{DomainError, ParticipantId, ResponseKind, SessionId, Timestamp};
use crate::domain::session::Response;
use async_trait::async_trait;

/// Repository port for session responses.
///
/// Responses are keyed by `(session_id, participant_id)`.
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Insert or replace the participant's answer, atomically per key.
    ///
    /// The write only lands while the session is active; the check and the
    /// write are one step. Returns `None` if the session is unknown or
    /// already closed.
    ///
    /// Replacing keeps the response's original position in
    /// [`list_by_session`](Self::list_by_session).
    async fn upsert(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
        kind: ResponseKind,
        at: Timestamp,
    ) -> Result<Option<Response>, DomainError>;

    /// All responses of a session in first-response order.
    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Response>, DomainError>;

    async fn find_one(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
    ) -> Result<Option<Response>, DomainError>;
}
