//! NotificationService - delivers the messages planned for a session event.
//!
//! Delivery is fire-and-forget per recipient: one failed send is logged and
//! never stops the rest of the fan-out or rolls back the transition that
//! produced the event.

use std::sync::Arc;

use futures::future::join_all;

use crate::domain::notification::{NotificationPolicy, OutboundMessage};
use crate::domain::participant::Roster;
use crate::domain::session::SessionEvent;
use crate::ports::{Messenger, ParticipantRepository};

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

pub struct NotificationService {
    messenger: Arc<dyn Messenger>,
    participants: Arc<dyn ParticipantRepository>,
    policy: NotificationPolicy,
}

impl NotificationService {
    pub fn new(messenger: Arc<dyn Messenger>, participants: Arc<dyn ParticipantRepository>) -> Self {
        Self {
            messenger,
            participants,
            policy: NotificationPolicy::new(),
        }
    }

    /// Plans and delivers the notifications for `event`.
    pub async fn dispatch(&self, event: &SessionEvent) -> DeliveryReport {
        let roster = match self.participants.find_all().await {
            Ok(participants) => Roster::new(participants),
            Err(e) => {
                tracing::error!(
                    session_id = %event.session().id(),
                    event = event.name(),
                    error = %e,
                    "Failed to load roster, notifications dropped"
                );
                return DeliveryReport::default();
            }
        };

        let messages = self.policy.plan(event, &roster);
        let report = self.deliver(messages).await;

        tracing::debug!(
            session_id = %event.session().id(),
            event = event.name(),
            delivered = report.delivered,
            failed = report.failed,
            "Notifications dispatched"
        );
        report
    }

    /// Sends every message concurrently.
    pub async fn deliver(&self, messages: Vec<OutboundMessage>) -> DeliveryReport {
        let sends = messages.iter().map(|message| async move {
            match self.messenger.send(message).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(
                        recipient = %message.recipient,
                        error = %e,
                        retryable = e.is_retryable(),
                        "Notification delivery failed"
                    );
                    false
                }
            }
        });

        let results = join_all(sends).await;
        let delivered = results.iter().filter(|ok| **ok).count();

        DeliveryReport {
            delivered,
            failed: results.len() - delivered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryParticipantStore;
    use crate::domain::foundation::{ParticipantId, ResponseKind, SessionId, Timestamp};
    use crate::domain::participant::{Participant, ParticipantProfile};
    use crate::domain::session::{Response, Session};
    use crate::ports::{MessageRef, MessengerError};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    const A: ParticipantId = ParticipantId::new(1);
    const B: ParticipantId = ParticipantId::new(2);
    const C: ParticipantId = ParticipantId::new(3);

    struct RecordingMessenger {
        sent: Mutex<Vec<OutboundMessage>>,
        unreachable: HashSet<ParticipantId>,
    }

    impl RecordingMessenger {
        fn new() -> Self {
            Self::failing_for(&[])
        }

        fn failing_for(ids: &[ParticipantId]) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                unreachable: ids.iter().copied().collect(),
            }
        }

        fn recipients(&self) -> Vec<ParticipantId> {
            let mut ids: Vec<_> = self.sent.lock().unwrap().iter().map(|m| m.recipient).collect();
            ids.sort();
            ids
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send(&self, message: &OutboundMessage) -> Result<MessageRef, MessengerError> {
            if self.unreachable.contains(&message.recipient) {
                return Err(MessengerError::Rejected {
                    code: 403,
                    description: "Forbidden: bot was blocked by the user".into(),
                });
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(MessageRef::new(message.recipient.as_i64(), 1))
        }

        async fn edit(&self, _: MessageRef, _: &str) -> Result<(), MessengerError> {
            Ok(())
        }

        async fn answer_callback(&self, _: &str, _: &str) -> Result<(), MessengerError> {
            Ok(())
        }
    }

    async fn roster_store(ids: &[ParticipantId]) -> Arc<InMemoryParticipantStore> {
        let store = Arc::new(InMemoryParticipantStore::new());
        for id in ids {
            store
                .create(&Participant::new(
                    *id,
                    ParticipantProfile::new(None, format!("P{}", id), None),
                    Timestamp::from_unix_secs(0),
                ))
                .await
                .unwrap();
        }
        store
    }

    fn session() -> Session {
        Session::open(SessionId::new(1), A, Timestamp::from_unix_secs(0))
    }

    #[tokio::test]
    async fn started_event_reaches_invitees_and_initiator() {
        let messenger = Arc::new(RecordingMessenger::new());
        let service = NotificationService::new(messenger.clone(), roster_store(&[A, B, C]).await);

        let report = service
            .dispatch(&SessionEvent::Started {
                session: session(),
                invitees: vec![B, C],
            })
            .await;

        assert_eq!(report, DeliveryReport { delivered: 3, failed: 0 });
        assert_eq!(messenger.recipients(), vec![A, B, C]);
    }

    #[tokio::test]
    async fn one_failed_recipient_does_not_stop_the_others() {
        let messenger = Arc::new(RecordingMessenger::failing_for(&[B]));
        let service = NotificationService::new(messenger.clone(), roster_store(&[A, B, C]).await);

        let report = service
            .dispatch(&SessionEvent::Started {
                session: session(),
                invitees: vec![B, C],
            })
            .await;

        assert_eq!(report, DeliveryReport { delivered: 2, failed: 1 });
        assert_eq!(messenger.recipients(), vec![A, C]);
    }

    #[tokio::test]
    async fn auto_completed_reaches_initiator_and_attendees_once() {
        let messenger = Arc::new(RecordingMessenger::new());
        let service = NotificationService::new(messenger.clone(), roster_store(&[A, B, C]).await);
        let at = Timestamp::from_unix_secs(10);

        let mut closed = session();
        closed.complete(at).unwrap();
        service
            .dispatch(&SessionEvent::AutoCompleted {
                session: closed,
                responses: vec![
                    Response::new(SessionId::new(1), A, ResponseKind::Accepted, at),
                    Response::new(SessionId::new(1), B, ResponseKind::AcceptedDelayed, at),
                    Response::new(SessionId::new(1), C, ResponseKind::Denied, at),
                ],
            })
            .await;

        assert_eq!(messenger.recipients(), vec![A, B]);
    }

    #[tokio::test]
    async fn empty_plan_delivers_nothing() {
        let messenger = Arc::new(RecordingMessenger::new());
        let service = NotificationService::new(messenger.clone(), roster_store(&[A]).await);

        let report = service.deliver(Vec::new()).await;

        assert_eq!(report, DeliveryReport::default());
        assert!(messenger.recipients().is_empty());
    }
}
