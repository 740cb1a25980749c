//! PostgreSQL implementation of SessionRepository.
//!
//! The single-active guarantee is the partial unique index
//! `sessions_single_active`; a second concurrent insert fails with a unique
//! violation which is reported as `SessionAlreadyActive`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, ParticipantId, SessionId, SessionStatus, Timestamp,
};
use crate::domain::session::Session;
use crate::ports::SessionRepository;

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a new PostgresSessionRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create_active(
        &self,
        initiator: ParticipantId,
        at: Timestamp,
    ) -> Result<Session, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO sessions (initiator_id, status, created_at)
            VALUES ($1, 'active', $2)
            RETURNING id
            "#,
        )
        .bind(initiator.as_i64())
        .bind(at.as_datetime())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                let id: i64 = row
                    .try_get("id")
                    .map_err(|e| DomainError::database("Failed to get id", e))?;
                Ok(Session::open(SessionId::new(id), initiator, at))
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DomainError::new(
                    ErrorCode::SessionAlreadyActive,
                    "A session is already active",
                ))
            }
            Err(e) => Err(DomainError::database("Failed to insert session", e)),
        }
    }

    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, initiator_id, status, created_at, completed_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch session", e))?;

        row.map(row_to_session).transpose()
    }

    async fn find_active(&self) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, initiator_id, status, created_at, completed_at
            FROM sessions
            WHERE status = 'active'
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch active session", e))?;

        row.map(row_to_session).transpose()
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions SET
                status = $2,
                completed_at = $3
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_i64())
        .bind(session.status().as_str())
        .bind(session.completed_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update session", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }

        Ok(())
    }

    async fn close(
        &self,
        id: SessionId,
        status: SessionStatus,
        at: Timestamp,
    ) -> Result<Option<Session>, DomainError> {
        if status.is_open() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot close session {} as {}", id, status),
            ));
        }

        let row = sqlx::query(
            r#"
            UPDATE sessions SET
                status = $2,
                completed_at = $3
            WHERE id = $1 AND status = 'active'
            RETURNING id, initiator_id, status, created_at, completed_at
            "#,
        )
        .bind(id.as_i64())
        .bind(status.as_str())
        .bind(at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to close session", e))?;

        row.map(row_to_session).transpose()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::database("Failed to get id", e))?;

    let initiator_id: i64 = row
        .try_get("initiator_id")
        .map_err(|e| DomainError::database("Failed to get initiator_id", e))?;

    let status_str: String = row
        .try_get("status")
        .map_err(|e| DomainError::database("Failed to get status", e))?;
    let status = SessionStatus::parse(&status_str)?;

    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::database("Failed to get created_at", e))?;

    let completed_at: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("completed_at")
        .map_err(|e| DomainError::database("Failed to get completed_at", e))?;

    Ok(Session::reconstitute(
        SessionId::new(id),
        ParticipantId::new(initiator_id),
        status,
        Timestamp::from_datetime(created_at),
        completed_at.map(Timestamp::from_datetime),
    ))
}
