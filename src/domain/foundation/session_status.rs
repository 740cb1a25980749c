//! SessionStatus enum for tracking the lifecycle of a session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DomainError, ErrorCode, StateMachine};

/// Lifecycle status of a session.
///
/// Completed and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Returns true if the session still accepts responses.
    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid session status: {}", other),
            )),
        }
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!((self, target), (Active, Completed) | (Active, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Active => vec![Completed, Cancelled],
            Completed | Cancelled => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "Active",
            SessionStatus::Completed => "Completed",
            SessionStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}
