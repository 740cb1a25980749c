//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresParticipantRepository` - Participant directory
//! - `PostgresSessionRepository` - Sessions with the single-active index
//! - `PostgresResponseRepository` - Upserted session responses

mod participant_repository;
mod response_repository;
mod session_repository;

pub use participant_repository::PostgresParticipantRepository;
pub use response_repository::PostgresResponseRepository;
pub use session_repository::PostgresSessionRepository;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Opens a connection pool and, if configured, applies pending migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::database("Failed to connect to database", e))?;

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DomainError::database("Failed to run migrations", e))?;
        tracing::info!("Database migrations applied");
    }

    Ok(pool)
}
