//! ResponseKind enum for a participant's reaction to a session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DomainError, ErrorCode};

/// How a participant answered an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// Coming now.
    Accepted,
    /// Coming within a few minutes.
    AcceptedDelayed,
    Denied,
    /// Working remotely today; also suppresses invitations until end of day.
    Remote,
}

impl ResponseKind {
    /// Returns true for the two "coming" answers.
    pub fn is_attending(&self) -> bool {
        matches!(self, ResponseKind::Accepted | ResponseKind::AcceptedDelayed)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Accepted => "accepted",
            ResponseKind::AcceptedDelayed => "accepted_delayed",
            ResponseKind::Denied => "denied",
            ResponseKind::Remote => "remote",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "accepted" => Ok(ResponseKind::Accepted),
            "accepted_delayed" => Ok(ResponseKind::AcceptedDelayed),
            "denied" => Ok(ResponseKind::Denied),
            "remote" => Ok(ResponseKind::Remote),
            other => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid response kind: {}", other),
            )),
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
