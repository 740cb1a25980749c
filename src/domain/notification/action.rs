//! Button actions and their wire tokens.
//!
//! A token is `<operation>:<session id>`, e.g. `accept:42`. It is what the
//! transport echoes back when a participant presses a button.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::foundation::{ResponseKind, SessionId};

/// Operation encoded in an action token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionOp {
    Accept,
    Delayed,
    Deny,
    Remote,
    Cancel,
}

impl ActionOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionOp::Accept => "accept",
            ActionOp::Delayed => "delayed",
            ActionOp::Deny => "deny",
            ActionOp::Remote => "remote",
            ActionOp::Cancel => "cancel",
        }
    }

    /// Response recorded for this operation; `None` for `Cancel`.
    pub fn response_kind(&self) -> Option<ResponseKind> {
        match self {
            ActionOp::Accept => Some(ResponseKind::Accepted),
            ActionOp::Delayed => Some(ResponseKind::AcceptedDelayed),
            ActionOp::Deny => Some(ResponseKind::Denied),
            ActionOp::Remote => Some(ResponseKind::Remote),
            ActionOp::Cancel => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("malformed action token: {0}")]
    Malformed(String),

    #[error("unknown action: {0}")]
    UnknownOperation(String),

    #[error("invalid session id in action: {0}")]
    InvalidSessionId(String),
}

/// Parsed `<operation>:<session id>` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionToken {
    pub op: ActionOp,
    pub session_id: SessionId,
}

impl ActionToken {
    pub fn new(op: ActionOp, session_id: SessionId) -> Self {
        Self { op, session_id }
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.op.as_str(), self.session_id)
    }
}

impl FromStr for ActionToken {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (op, id) = s
            .split_once(':')
            .ok_or_else(|| ActionParseError::Malformed(s.to_string()))?;

        let op = match op {
            "accept" => ActionOp::Accept,
            "delayed" => ActionOp::Delayed,
            "deny" => ActionOp::Deny,
            "remote" => ActionOp::Remote,
            "cancel" => ActionOp::Cancel,
            other => return Err(ActionParseError::UnknownOperation(other.to_string())),
        };

        let session_id = id
            .parse::<SessionId>()
            .map_err(|_| ActionParseError::InvalidSessionId(id.to_string()))?;

        Ok(Self { op, session_id })
    }
}

/// A labelled button carrying an action token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub label: String,
    pub token: ActionToken,
}

impl Action {
    pub fn new(label: impl Into<String>, op: ActionOp, session_id: SessionId) -> Self {
        Self {
            label: label.into(),
            token: ActionToken::new(op, session_id),
        }
    }
}
