//! Outcomes reported by the coordinator to the notification layer.

use super::{Response, Session};
use crate::domain::foundation::{ParticipantId, ResponseKind};

/// What a coordinator operation changed.
///
/// Every variant carries the session snapshot taken right after the change,
/// and the events that concern respondents carry the response list too, so
/// the notification policy never has to go back to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was opened and these participants were eligible.
    Started {
        session: Session,
        invitees: Vec<ParticipantId>,
    },

    /// A session was opened but nobody could be invited, so it was cancelled.
    NobodyToInvite { session: Session },

    Responded {
        session: Session,
        responder: ParticipantId,
        kind: ResponseKind,
        responses: Vec<Response>,
    },

    Cancelled {
        session: Session,
        cancelled_by: ParticipantId,
        responses: Vec<Response>,
    },

    /// The session timed out and was completed by the reaper.
    AutoCompleted {
        session: Session,
        responses: Vec<Response>,
    },
}

impl SessionEvent {
    pub fn session(&self) -> &Session {
        match self {
            SessionEvent::Started { session, .. }
            | SessionEvent::NobodyToInvite { session }
            | SessionEvent::Responded { session, .. }
            | SessionEvent::Cancelled { session, .. }
            | SessionEvent::AutoCompleted { session, .. } => session,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Started { .. } => "started",
            SessionEvent::NobodyToInvite { .. } => "nobody_to_invite",
            SessionEvent::Responded { .. } => "responded",
            SessionEvent::Cancelled { .. } => "cancelled",
            SessionEvent::AutoCompleted { .. } => "auto_completed",
        }
    }
}
