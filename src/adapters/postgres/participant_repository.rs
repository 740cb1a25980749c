//! PostgreSQL implementation of ParticipantRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, ParticipantId, Timestamp};
use crate::domain::participant::Participant;
use crate::ports::ParticipantRepository;

/// PostgreSQL implementation of ParticipantRepository.
#[derive(Clone)]
pub struct PostgresParticipantRepository {
    pool: PgPool,
}

impl PostgresParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, username, first_name, last_name, is_remote_today, remote_until,
           is_hidden, created_at, updated_at
    FROM participants
"#;

#[async_trait]
impl ParticipantRepository for PostgresParticipantRepository {
    async fn create(&self, participant: &Participant) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO participants (
                id, username, first_name, last_name, is_remote_today, remote_until,
                is_hidden, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(participant.id().as_i64())
        .bind(participant.username())
        .bind(participant.first_name())
        .bind(participant.last_name())
        .bind(participant.is_remote_today())
        .bind(participant.remote_until().map(|t| *t.as_datetime()))
        .bind(participant.is_hidden())
        .bind(participant.created_at().as_datetime())
        .bind(participant.updated_at().as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DomainError::new(
                    ErrorCode::ValidationFailed,
                    format!("Participant already exists: {}", participant.id()),
                ))
            }
            Err(e) => Err(DomainError::database("Failed to insert participant", e)),
        }
    }

    async fn find_by_id(&self, id: ParticipantId) -> Result<Option<Participant>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch participant", e))?;

        row.map(row_to_participant).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Participant>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY username NULLS FIRST, first_name, id",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch participants", e))?;

        rows.into_iter().map(row_to_participant).collect()
    }

    async fn update(&self, participant: &Participant) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE participants SET
                username = $2,
                first_name = $3,
                last_name = $4,
                is_remote_today = $5,
                remote_until = $6,
                is_hidden = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(participant.id().as_i64())
        .bind(participant.username())
        .bind(participant.first_name())
        .bind(participant.last_name())
        .bind(participant.is_remote_today())
        .bind(participant.remote_until().map(|t| *t.as_datetime()))
        .bind(participant.is_hidden())
        .bind(participant.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update participant", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(participant.id()));
        }

        Ok(())
    }

    async fn delete(&self, id: ParticipantId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete participant", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }

    async fn set_remote_until(
        &self,
        id: ParticipantId,
        until: Timestamp,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE participants SET
                is_remote_today = TRUE,
                remote_until = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(until.as_datetime())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to set remote status", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }

    async fn clear_expired_remote(&self, now: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE participants SET
                is_remote_today = FALSE,
                remote_until = NULL,
                updated_at = $1
            WHERE is_remote_today AND remote_until < $1
            "#,
        )
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to expire remote status", e))?;

        Ok(result.rows_affected())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn not_found(id: ParticipantId) -> DomainError {
    DomainError::new(
        ErrorCode::ParticipantNotFound,
        format!("Participant not found: {}", id),
    )
}

fn row_to_participant(row: sqlx::postgres::PgRow) -> Result<Participant, DomainError> {
    let column = |name: &str, e: sqlx::Error| {
        DomainError::database(&format!("Failed to get {}", name), e)
    };

    let id: i64 = row.try_get("id").map_err(|e| column("id", e))?;
    let username: Option<String> = row.try_get("username").map_err(|e| column("username", e))?;
    let first_name: String = row
        .try_get("first_name")
        .map_err(|e| column("first_name", e))?;
    let last_name: Option<String> = row
        .try_get("last_name")
        .map_err(|e| column("last_name", e))?;
    let is_remote_today: bool = row
        .try_get("is_remote_today")
        .map_err(|e| column("is_remote_today", e))?;
    let remote_until: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("remote_until")
        .map_err(|e| column("remote_until", e))?;
    let is_hidden: bool = row
        .try_get("is_hidden")
        .map_err(|e| column("is_hidden", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| column("created_at", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| column("updated_at", e))?;

    Ok(Participant::reconstitute(
        ParticipantId::new(id),
        username,
        first_name,
        last_name,
        is_remote_today,
        remote_until.map(Timestamp::from_datetime),
        is_hidden,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
