//! In-memory session and response storage.
//!
//! Sessions and responses share one lock so that the single-active check
//! and the insert that follows it happen as one step.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::foundation::{
    DomainError, ErrorCode, ParticipantId, ResponseKind, SessionId, SessionStatus, Timestamp,
};
use crate::domain::session::{Response, Session};
use crate::ports::{ResponseRepository, SessionRepository};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    sessions: HashMap<SessionId, Session>,
    /// Responses in first-response order.
    responses: Vec<Response>,
}

/// In-memory implementation of the `SessionRepository` and
/// `ResponseRepository` ports.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    state: Mutex<State>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions ever created.
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn create_active(
        &self,
        initiator: ParticipantId,
        at: Timestamp,
    ) -> Result<Session, DomainError> {
        let mut state = self.state.lock().await;

        if state.sessions.values().any(Session::is_active) {
            return Err(DomainError::new(
                ErrorCode::SessionAlreadyActive,
                "A session is already active",
            ));
        }

        state.next_id += 1;
        let session = Session::open(SessionId::new(state.next_id), initiator, at);
        state.sessions.insert(session.id(), session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.state.lock().await.sessions.get(&id).cloned())
    }

    async fn find_active(&self) -> Result<Option<Session>, DomainError> {
        Ok(self
            .state
            .lock()
            .await
            .sessions
            .values()
            .find(|s| s.is_active())
            .cloned())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        match state.sessions.get_mut(&session.id()) {
            Some(existing) => {
                *existing = session.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )),
        }
    }

    async fn close(
        &self,
        id: SessionId,
        status: SessionStatus,
        at: Timestamp,
    ) -> Result<Option<Session>, DomainError> {
        let mut state = self.state.lock().await;
        let Some(session) = state.sessions.get_mut(&id) else {
            return Ok(None);
        };
        if !session.is_active() {
            return Ok(None);
        }
        if session.close(status, at).is_err() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot close session {} as {}", id, status),
            ));
        }
        Ok(Some(session.clone()))
    }
}

#[async_trait]
impl ResponseRepository for InMemorySessionStore {
    async fn upsert(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
        kind: ResponseKind,
        at: Timestamp,
    ) -> Result<Option<Response>, DomainError> {
        let mut state = self.state.lock().await;
        if !state.sessions.get(&session_id).is_some_and(Session::is_active) {
            return Ok(None);
        }
        let response = Response::new(session_id, participant_id, kind, at);

        match state
            .responses
            .iter_mut()
            .find(|r| r.session_id == session_id && r.participant_id == participant_id)
        {
            Some(existing) => *existing = response.clone(),
            None => state.responses.push(response.clone()),
        }
        Ok(Some(response))
    }

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Response>, DomainError> {
        Ok(self
            .state
            .lock()
            .await
            .responses
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn find_one(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
    ) -> Result<Option<Response>, DomainError> {
        Ok(self
            .state
            .lock()
            .await
            .responses
            .iter()
            .find(|r| r.session_id == session_id && r.participant_id == participant_id)
            .cloned())
    }
}
