//! In-memory participant directory storage.
//!
//! Backs database-less runs and tests. Does not persist across restarts.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ParticipantId, Timestamp};
use crate::domain::participant::Participant;
use crate::ports::ParticipantRepository;

/// In-memory implementation of the `ParticipantRepository` port.
#[derive(Debug, Default)]
pub struct InMemoryParticipantStore {
    participants: RwLock<HashMap<ParticipantId, Participant>>,
}

impl InMemoryParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored participants.
    pub async fn len(&self) -> usize {
        self.participants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.participants.read().await.is_empty()
    }
}

fn not_found(id: ParticipantId) -> DomainError {
    DomainError::new(
        ErrorCode::ParticipantNotFound,
        format!("Participant not found: {}", id),
    )
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantStore {
    async fn create(&self, participant: &Participant) -> Result<(), DomainError> {
        let mut participants = self.participants.write().await;
        if participants.contains_key(&participant.id()) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Participant already exists: {}", participant.id()),
            ));
        }
        participants.insert(participant.id(), participant.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ParticipantId) -> Result<Option<Participant>, DomainError> {
        Ok(self.participants.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Participant>, DomainError> {
        let mut all: Vec<Participant> = self.participants.read().await.values().cloned().collect();
        all.sort_by(|a, b| {
            a.username()
                .cmp(&b.username())
                .then_with(|| a.first_name().cmp(b.first_name()))
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(all)
    }

    async fn update(&self, participant: &Participant) -> Result<(), DomainError> {
        let mut participants = self.participants.write().await;
        match participants.get_mut(&participant.id()) {
            Some(existing) => {
                *existing = participant.clone();
                Ok(())
            }
            None => Err(not_found(participant.id())),
        }
    }

    async fn delete(&self, id: ParticipantId) -> Result<(), DomainError> {
        self.participants
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    async fn set_remote_until(
        &self,
        id: ParticipantId,
        until: Timestamp,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let mut participants = self.participants.write().await;
        let participant = participants.get_mut(&id).ok_or_else(|| not_found(id))?;
        participant.mark_remote_until(until, now);
        Ok(())
    }

    async fn clear_expired_remote(&self, now: Timestamp) -> Result<u64, DomainError> {
        let mut participants = self.participants.write().await;
        let mut cleared = 0;
        for participant in participants.values_mut() {
            let expired = participant.is_remote_today()
                && participant
                    .remote_until()
                    .map(|until| until.is_before(&now))
                    .unwrap_or(false);
            if expired {
                participant.clear_remote(now);
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::participant::ParticipantProfile;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs)
    }

    fn participant(id: i64, username: Option<&str>, first_name: &str) -> Participant {
        Participant::new(
            ParticipantId::new(id),
            ParticipantProfile::new(username.map(String::from), first_name, None),
            ts(0),
        )
    }

    #[tokio::test]
    async fn create_rejects_duplicates() {
        let store = InMemoryParticipantStore::new();
        let p = participant(1, Some("anna"), "Anna");

        store.create(&p).await.unwrap();
        let err = store.create(&p).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_and_delete_require_existing_participant() {
        let store = InMemoryParticipantStore::new();
        let p = participant(1, Some("anna"), "Anna");

        assert_eq!(
            store.update(&p).await.unwrap_err().code,
            ErrorCode::ParticipantNotFound
        );
        assert_eq!(
            store.delete(p.id()).await.unwrap_err().code,
            ErrorCode::ParticipantNotFound
        );
    }

    #[tokio::test]
    async fn find_all_orders_by_username_then_first_name() {
        let store = InMemoryParticipantStore::new();
        store.create(&participant(1, Some("zed"), "Z")).await.unwrap();
        store.create(&participant(2, None, "Bob")).await.unwrap();
        store.create(&participant(3, Some("amy"), "A")).await.unwrap();
        store.create(&participant(4, None, "Al")).await.unwrap();

        let ids: Vec<i64> = store
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id().as_i64())
            .collect();

        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[tokio::test]
    async fn clear_expired_remote_only_touches_past_deadlines() {
        let store = InMemoryParticipantStore::new();
        store.create(&participant(1, Some("a"), "A")).await.unwrap();
        store.create(&participant(2, Some("b"), "B")).await.unwrap();
        store
            .set_remote_until(ParticipantId::new(1), ts(100), ts(10))
            .await
            .unwrap();
        store
            .set_remote_until(ParticipantId::new(2), ts(300), ts(10))
            .await
            .unwrap();

        let cleared = store.clear_expired_remote(ts(200)).await.unwrap();

        assert_eq!(cleared, 1);
        let a = store.find_by_id(ParticipantId::new(1)).await.unwrap().unwrap();
        let b = store.find_by_id(ParticipantId::new(2)).await.unwrap().unwrap();
        assert!(!a.is_remote_today());
        assert!(b.is_remote_today());
    }
}
