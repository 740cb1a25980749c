//! A participant's recorded answer to a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ParticipantId, ResponseKind, SessionId, Timestamp};

/// One row per `(session_id, participant_id)`; later answers replace it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    pub kind: ResponseKind,
    /// Time of the most recent answer.
    pub responded_at: Timestamp,
}

impl Response {
    pub fn new(
        session_id: SessionId,
        participant_id: ParticipantId,
        kind: ResponseKind,
        responded_at: Timestamp,
    ) -> Self {
        Self {
            session_id,
            participant_id,
            kind,
            responded_at,
        }
    }

    pub fn is_attending(&self) -> bool {
        self.kind.is_attending()
    }
}
