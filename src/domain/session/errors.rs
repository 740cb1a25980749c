//! Session-specific error types.
//!
//! # Categories
//!
//! | Error | Kind |
//! |-------|------|
//! | AlreadyActive, NotFound, NotActive, NotInitiator, ParticipantNotFound | validation (user-facing) |
//! | Infrastructure | persistence failure (logged) |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ParticipantId, SessionId};

/// Session-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Another session is already open.
    #[error("A session is already active")]
    AlreadyActive,

    #[error("Session not found: {0}")]
    NotFound(SessionId),

    /// The session is already completed or cancelled.
    #[error("Session {0} is not active")]
    NotActive(SessionId),

    /// Only the initiator may cancel.
    #[error("Only the initiator can cancel session {0}")]
    NotInitiator(SessionId),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl SessionError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::AlreadyActive => ErrorCode::SessionAlreadyActive,
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::NotActive(_) => ErrorCode::SessionNotActive,
            SessionError::NotInitiator(_) => ErrorCode::NotInitiator,
            SessionError::ParticipantNotFound(_) => ErrorCode::ParticipantNotFound,
            SessionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Expected, recoverable outcomes that are reported to the user and not
    /// logged as failures.
    pub fn is_validation(&self) -> bool {
        !matches!(self, SessionError::Infrastructure(_))
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionAlreadyActive => SessionError::AlreadyActive,
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}
