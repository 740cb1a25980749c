//! SessionCoordinator - the session state machine.
//!
//! Sole writer of session and response state. Every mutating operation
//! returns a `SessionEvent` snapshot for the notification layer; delivery is
//! never part of a transition.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{ParticipantId, ResponseKind, SessionId, SessionStatus};
use crate::domain::participant::Roster;
use crate::domain::session::{Session, SessionError, SessionEvent, SessionSummary};
use crate::ports::{Clock, ParticipantRepository, ResponseRepository, SessionRepository};

use super::RemoteStatusManager;

pub struct SessionCoordinator {
    sessions: Arc<dyn SessionRepository>,
    responses: Arc<dyn ResponseRepository>,
    participants: Arc<dyn ParticipantRepository>,
    remote_status: Arc<RemoteStatusManager>,
    clock: Arc<dyn Clock>,
}

impl SessionCoordinator {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        responses: Arc<dyn ResponseRepository>,
        participants: Arc<dyn ParticipantRepository>,
        remote_status: Arc<RemoteStatusManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            responses,
            participants,
            remote_status,
            clock,
        }
    }

    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// - `AlreadyActive` if another session is open
    pub async fn start_session(&self, initiator: ParticipantId) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .create_active(initiator, self.clock.now())
            .await?;

        tracing::info!(
            session_id = %session.id(),
            initiator_id = %initiator,
            "Session started"
        );
        Ok(session)
    }

    /// Starts a session and works out who to invite.
    ///
    /// With nobody to invite the session is cancelled straight away and
    /// `NobodyToInvite` is returned, so the next attempt is not blocked.
    pub async fn open_session(&self, initiator: ParticipantId) -> Result<SessionEvent, SessionError> {
        // 1. Claim the single active slot
        let session = self.start_session(initiator).await?;

        // 2. Compute invitees; release the slot if that fails
        let invitees = match self.eligible_invitees(initiator).await {
            Ok(invitees) => invitees,
            Err(e) => {
                self.release(&session).await;
                return Err(e);
            }
        };

        // 3. Nobody available
        if invitees.is_empty() {
            let session = self.release(&session).await.unwrap_or(session);
            tracing::info!(session_id = %session.id(), "No one to invite, session cancelled");
            return Ok(SessionEvent::NobodyToInvite { session });
        }

        tracing::debug!(session_id = %session.id(), invitees = invitees.len(), "Invitations planned");
        Ok(SessionEvent::Started { session, invitees })
    }

    /// Records (or replaces) a participant's answer.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session doesn't exist
    /// - `NotActive` if the session is already closed, including a close
    ///   that lands after the state check
    /// - `ParticipantNotFound` for a `Remote` answer from an unknown
    ///   participant (the answer itself is already stored)
    pub async fn respond_to_session(
        &self,
        session_id: SessionId,
        participant: ParticipantId,
        kind: ResponseKind,
    ) -> Result<SessionEvent, SessionError> {
        // 1. Load and check state
        let session = self.load(session_id).await?;
        session.ensure_active()?;

        // 2. Upsert the answer; the store refuses it if the session closed meanwhile
        self.responses
            .upsert(session_id, participant, kind, self.clock.now())
            .await?
            .ok_or(SessionError::NotActive(session_id))?;

        // 3. Remote answers also suppress invitations for the rest of the day
        if kind == ResponseKind::Remote {
            self.remote_status.set_remote(participant).await?;
        }

        // 4. Snapshot for notification
        let responses = self.responses.list_by_session(session_id).await?;

        tracing::info!(
            session_id = %session_id,
            participant_id = %participant,
            kind = %kind,
            "Response recorded"
        );

        Ok(SessionEvent::Responded {
            session,
            responder: participant,
            kind,
            responses,
        })
    }

    /// Cancels a session on behalf of its initiator.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session doesn't exist
    /// - `NotActive` if the session is already closed
    /// - `NotInitiator` if `requested_by` did not start it
    pub async fn cancel_session(
        &self,
        session_id: SessionId,
        requested_by: ParticipantId,
    ) -> Result<SessionEvent, SessionError> {
        // 1. Load and authorize
        let session = self.load(session_id).await?;
        session.ensure_active()?;
        session.authorize_cancel(requested_by)?;

        // 2. Close; a concurrent close wins over us
        let session = self
            .sessions
            .close(session_id, SessionStatus::Cancelled, self.clock.now())
            .await?
            .ok_or(SessionError::NotActive(session_id))?;

        // 3. Snapshot respondents
        let responses = self.responses.list_by_session(session_id).await?;

        tracing::info!(session_id = %session_id, cancelled_by = %requested_by, "Session cancelled");

        Ok(SessionEvent::Cancelled {
            session,
            cancelled_by: requested_by,
            responses,
        })
    }

    /// Marks a session completed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session doesn't exist
    /// - `NotActive` if the session is already closed
    pub async fn complete_session(&self, session_id: SessionId) -> Result<Session, SessionError> {
        let session = self.load(session_id).await?;
        session.ensure_active()?;

        let session = self
            .sessions
            .close(session_id, SessionStatus::Completed, self.clock.now())
            .await?
            .ok_or(SessionError::NotActive(session_id))?;

        tracing::info!(session_id = %session_id, "Session completed");
        Ok(session)
    }

    /// Completes the active session if it is older than `threshold`.
    ///
    /// Returns `None` when there is nothing stale, or when the session was
    /// closed by someone else between the check and the close.
    pub async fn auto_complete_stale(
        &self,
        threshold: Duration,
    ) -> Result<Option<SessionEvent>, SessionError> {
        let now = self.clock.now();

        let Some(active) = self.sessions.find_active().await? else {
            return Ok(None);
        };
        if !active.is_stale(&now, threshold) {
            return Ok(None);
        }

        let Some(session) = self
            .sessions
            .close(active.id(), SessionStatus::Completed, now)
            .await?
        else {
            tracing::debug!(session_id = %active.id(), "Stale session already closed");
            return Ok(None);
        };

        let responses = self.responses.list_by_session(session.id()).await?;

        tracing::info!(
            session_id = %session.id(),
            age_secs = now.duration_since(session.created_at()).num_seconds(),
            "Stale session auto-completed"
        );

        Ok(Some(SessionEvent::AutoCompleted { session, responses }))
    }

    /// Current answers grouped for display.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session doesn't exist
    pub async fn get_summary(&self, session_id: SessionId) -> Result<SessionSummary, SessionError> {
        self.load(session_id).await?;
        let responses = self.responses.list_by_session(session_id).await?;
        let roster = Roster::new(self.participants.find_all().await?);
        Ok(SessionSummary::build(&responses, &roster))
    }

    /// Everyone who should be invited to a session started by `initiator`.
    pub async fn eligible_invitees(
        &self,
        initiator: ParticipantId,
    ) -> Result<Vec<ParticipantId>, SessionError> {
        self.remote_status.expire_stale().await?;

        let now = self.clock.now();
        Ok(self
            .participants
            .find_all()
            .await?
            .into_iter()
            .filter(|p| p.id() != initiator && p.is_available(&now))
            .map(|p| p.id())
            .collect())
    }

    pub async fn active_session(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.sessions.find_active().await?)
    }

    async fn load(&self, session_id: SessionId) -> Result<Session, SessionError> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound(session_id))
    }

    /// Best-effort cancel of a session that could not be opened properly.
    async fn release(&self, session: &Session) -> Option<Session> {
        match self
            .sessions
            .close(session.id(), SessionStatus::Cancelled, self.clock.now())
            .await
        {
            Ok(closed) => closed,
            Err(e) => {
                tracing::error!(session_id = %session.id(), error = %e, "Failed to release session");
                None
            }
        }
    }
}
