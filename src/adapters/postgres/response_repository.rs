//! PostgreSQL implementation of ResponseRepository.
//!
//! Rows are ordered by their serial id. An upsert updates the row in place,
//! so a changed answer keeps its original position, and only writes while
//! the session row is still active.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ParticipantId, ResponseKind, SessionId, Timestamp};
use crate::domain::session::Response;
use crate::ports::ResponseRepository;

#[derive(Clone)]
pub struct PostgresResponseRepository {
    pool: PgPool,
}

impl PostgresResponseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseRepository for PostgresResponseRepository {
    async fn upsert(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
        kind: ResponseKind,
        at: Timestamp,
    ) -> Result<Option<Response>, DomainError> {
        // FOR SHARE holds off a concurrent close until this write commits.
        let row = sqlx::query(
            r#"
            INSERT INTO session_responses (session_id, participant_id, kind, responded_at)
            SELECT $1, $2, $3, $4
            WHERE EXISTS (
                SELECT 1 FROM sessions
                WHERE id = $1 AND status = 'active'
                FOR SHARE
            )
            ON CONFLICT (session_id, participant_id) DO UPDATE SET
                kind = EXCLUDED.kind,
                responded_at = EXCLUDED.responded_at
            RETURNING session_id, participant_id, kind, responded_at
            "#,
        )
        .bind(session_id.as_i64())
        .bind(participant_id.as_i64())
        .bind(kind.as_str())
        .bind(at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to upsert response", e))?;

        row.map(row_to_response).transpose()
    }

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Response>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT session_id, participant_id, kind, responded_at
            FROM session_responses
            WHERE session_id = $1
            ORDER BY id
            "#,
        )
        .bind(session_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch responses", e))?;

        rows.into_iter().map(row_to_response).collect()
    }

    async fn find_one(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
    ) -> Result<Option<Response>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT session_id, participant_id, kind, responded_at
            FROM session_responses
            WHERE session_id = $1 AND participant_id = $2
            "#,
        )
        .bind(session_id.as_i64())
        .bind(participant_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch response", e))?;

        row.map(row_to_response).transpose()
    }
}

fn row_to_response(row: sqlx::postgres::PgRow) -> Result<Response, DomainError> {
    let session_id: i64 = row
        .try_get("session_id")
        .map_err(|e| DomainError::database("Failed to get session_id", e))?;
    let participant_id: i64 = row
        .try_get("participant_id")
        .map_err(|e| DomainError::database("Failed to get participant_id", e))?;
    let kind: String = row
        .try_get("kind")
        .map_err(|e| DomainError::database("Failed to get kind", e))?;
    let responded_at: chrono::DateTime<chrono::Utc> = row
        .try_get("responded_at")
        .map_err(|e| DomainError::database("Failed to get responded_at", e))?;

    Ok(Response::new(
        SessionId::new(session_id),
        ParticipantId::new(participant_id),
        ResponseKind::parse(&kind)?,
        Timestamp::from_datetime(responded_at),
    ))
}
