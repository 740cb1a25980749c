//! UpdateRouter - turns Telegram updates into coordinator calls.
//!
//! Every update first registers its sender in the directory. Commands reply
//! to the sender; button callbacks are answered, the pressed message is
//! edited in place, and the resulting session event is fanned out.
//!
//! Validation outcomes (`SessionError::is_validation`) become user replies
//! and are logged at debug level. Anything else is logged as an error and
//! the user gets a generic failure message.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::application::{
    NotificationService, ParticipantDirectory, RemoteStatusManager, SessionCoordinator,
};
use crate::config::ScheduleConfig;
use crate::domain::foundation::{ParticipantId, ResponseKind, SessionId};
use crate::domain::notification::{texts, ActionOp, ActionToken, OutboundMessage};
use crate::domain::session::{SessionError, SessionEvent};
use crate::ports::{Clock, MessageRef, Messenger};

use super::types::{CallbackQuery, Message, Update, User};

/// Services the router drives.
pub struct RouterServices {
    pub directory: Arc<ParticipantDirectory>,
    pub coordinator: Arc<SessionCoordinator>,
    pub remote_status: Arc<RemoteStatusManager>,
    pub notifier: Arc<NotificationService>,
    pub messenger: Arc<dyn Messenger>,
    pub clock: Arc<dyn Clock>,
}

pub struct UpdateRouter {
    services: RouterServices,
    schedule: ScheduleConfig,
    timezone: Tz,
}

impl UpdateRouter {
    pub fn new(services: RouterServices, schedule: ScheduleConfig, timezone: Tz) -> Self {
        Self {
            services,
            schedule,
            timezone,
        }
    }

    /// Handles one update. Never fails; problems are logged and, where a
    /// user is waiting, reported back to them.
    pub async fn handle(&self, update: Update) {
        if let Some(query) = update.callback_query {
            self.handle_callback(query).await;
        } else if let Some(message) = update.message {
            self.handle_message(message).await;
        } else {
            tracing::debug!(update_id = update.update_id, "Ignoring unsupported update");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────────

    async fn handle_message(&self, message: Message) {
        let Some(user) = message.from.as_ref() else {
            return;
        };
        if user.is_bot {
            return;
        }
        let Some(sender) = self.register(user).await else {
            return;
        };

        let command = match message.command() {
            Some(command) => command,
            None if message.text.as_deref().map(str::trim) == Some(texts::START_BUTTON) => "smoke",
            None => {
                tracing::debug!(participant_id = %sender, "Ignoring plain text message");
                return;
            }
        };

        tracing::debug!(participant_id = %sender, command, "Command received");

        match command {
            "start" => {
                let reply = OutboundMessage::text(sender, texts::welcome(&user.first_name))
                    .with_shortcuts(vec![texts::START_BUTTON.to_string()]);
                self.send(reply).await;
            }
            "smoke" => self.start_session(sender).await,
            "status" => self.status(sender).await,
            "cancel" => self.cancel_active(sender).await,
            "office" => self.back_in_office(sender).await,
            "help" => {
                let help = texts::help(self.schedule.work_start_hour, self.schedule.work_end_hour);
                self.reply(sender, help).await;
            }
            _ => self.reply(sender, texts::UNKNOWN_COMMAND).await,
        }
    }

    async fn start_session(&self, sender: ParticipantId) {
        let hour = self.services.clock.now().hour_in(self.timezone);
        if !self.schedule.is_working_hour(hour) {
            let notice =
                texts::outside_working_hours(self.schedule.work_start_hour, self.schedule.work_end_hour);
            self.reply(sender, notice).await;
            return;
        }

        match self.services.coordinator.open_session(sender).await {
            Ok(event) => self.dispatch(&event).await,
            Err(e) => self.report(sender, "start", &e).await,
        }
    }

    async fn status(&self, sender: ParticipantId) {
        let active = match self.services.coordinator.active_session().await {
            Ok(Some(session)) => session,
            Ok(None) => return self.reply(sender, texts::NO_ACTIVE_SESSION).await,
            Err(e) => return self.report(sender, "status", &e).await,
        };

        match self.services.coordinator.get_summary(active.id()).await {
            Ok(summary) => self.reply(sender, summary.render()).await,
            Err(e) => self.report(sender, "status", &e).await,
        }
    }

    async fn cancel_active(&self, sender: ParticipantId) {
        let active = match self.services.coordinator.active_session().await {
            Ok(Some(session)) => session,
            Ok(None) => return self.reply(sender, texts::NOTHING_TO_CANCEL).await,
            Err(e) => return self.report(sender, "cancel", &e).await,
        };

        match self.services.coordinator.cancel_session(active.id(), sender).await {
            Ok(event) => {
                self.reply(sender, texts::SESSION_CANCELLED).await;
                self.dispatch(&event).await;
            }
            Err(e) => self.report(sender, "cancel", &e).await,
        }
    }

    async fn back_in_office(&self, sender: ParticipantId) {
        match self.services.remote_status.clear_remote(sender).await {
            Ok(true) => self.reply(sender, texts::BACK_IN_OFFICE).await,
            Ok(false) => self.reply(sender, texts::NOT_REMOTE).await,
            Err(e) => self.report(sender, "office", &e).await,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Callbacks
    // ─────────────────────────────────────────────────────────────────────────

    async fn handle_callback(&self, query: CallbackQuery) {
        let Some(sender) = self.register(&query.from).await else {
            self.answer(&query.id, texts::GENERIC_FAILURE).await;
            return;
        };

        let token = match query.data.as_deref().map(str::parse::<ActionToken>) {
            Some(Ok(token)) => token,
            Some(Err(e)) => {
                tracing::debug!(participant_id = %sender, error = %e, "Invalid callback data");
                self.answer(&query.id, texts::INVALID_ACTION).await;
                return;
            }
            None => {
                self.answer(&query.id, texts::INVALID_ACTION).await;
                return;
            }
        };

        let pressed = query.message.as_ref();
        match token.op.response_kind() {
            Some(kind) => self.respond(&query.id, pressed, sender, token.session_id, kind).await,
            None => self.cancel_from_button(&query.id, pressed, sender, token.session_id).await,
        }
    }

    async fn respond(
        &self,
        callback_id: &str,
        pressed: Option<&Message>,
        sender: ParticipantId,
        session_id: SessionId,
        kind: ResponseKind,
    ) {
        match self
            .services
            .coordinator
            .respond_to_session(session_id, sender, kind)
            .await
        {
            Ok(event) => {
                let ack = texts::response_ack(kind);
                self.answer(callback_id, ack).await;
                self.append_footer(pressed, ack).await;
                self.dispatch(&event).await;
            }
            Err(e) => self.reject_callback(callback_id, pressed, sender, kind.as_str(), &e).await,
        }
    }

    async fn cancel_from_button(
        &self,
        callback_id: &str,
        pressed: Option<&Message>,
        sender: ParticipantId,
        session_id: SessionId,
    ) {
        match self
            .services
            .coordinator
            .cancel_session(session_id, sender)
            .await
        {
            Ok(event) => {
                self.answer(callback_id, texts::SESSION_CANCELLED).await;
                self.append_footer(pressed, texts::CANCELLED_MARKER).await;
                self.dispatch(&event).await;
            }
            Err(e) => {
                self.reject_callback(callback_id, pressed, sender, ActionOp::Cancel.as_str(), &e)
                    .await
            }
        }
    }

    async fn reject_callback(
        &self,
        callback_id: &str,
        pressed: Option<&Message>,
        sender: ParticipantId,
        operation: &str,
        error: &SessionError,
    ) {
        log_failure(sender, operation, error);
        match error {
            SessionError::NotActive(_) | SessionError::NotFound(_) => {
                self.answer(callback_id, texts::SESSION_NOT_ACTIVE).await;
                self.append_footer(pressed, texts::CLOSED_MARKER).await;
            }
            SessionError::NotInitiator(_) => {
                self.answer(callback_id, texts::ONLY_INITIATOR).await;
            }
            _ => self.answer(callback_id, texts::GENERIC_FAILURE).await,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn register(&self, user: &User) -> Option<ParticipantId> {
        let id = ParticipantId::new(user.id);
        match self.services.directory.register(id, user.profile()).await {
            Ok(_) => Some(id),
            Err(e) => {
                tracing::error!(participant_id = %id, error = %e, "Failed to register participant");
                self.reply(id, texts::GENERIC_FAILURE).await;
                None
            }
        }
    }

    async fn dispatch(&self, event: &SessionEvent) {
        self.services.notifier.dispatch(event).await;
    }

    async fn report(&self, sender: ParticipantId, operation: &str, error: &SessionError) {
        log_failure(sender, operation, error);
        self.reply(sender, reply_for(error)).await;
    }

    async fn reply(&self, recipient: ParticipantId, text: impl Into<String>) {
        self.send(OutboundMessage::text(recipient, text)).await;
    }

    async fn send(&self, message: OutboundMessage) {
        if let Err(e) = self.services.messenger.send(&message).await {
            tracing::warn!(recipient = %message.recipient, error = %e, "Reply failed");
        }
    }

    async fn answer(&self, callback_id: &str, text: &str) {
        if let Err(e) = self.services.messenger.answer_callback(callback_id, text).await {
            tracing::warn!(callback_id, error = %e, "Callback answer failed");
        }
    }

    async fn append_footer(&self, pressed: Option<&Message>, footer: &str) {
        let Some(message) = pressed else {
            return;
        };
        let original = message.text.as_deref().unwrap_or_default();
        let target = MessageRef::new(message.chat.id, message.message_id);
        if let Err(e) = self
            .services
            .messenger
            .edit(target, &texts::with_footer(original, footer))
            .await
        {
            tracing::warn!(chat_id = message.chat.id, error = %e, "Message edit failed");
        }
    }
}

fn log_failure(sender: ParticipantId, operation: &str, error: &SessionError) {
    if error.is_validation() {
        tracing::debug!(participant_id = %sender, operation, error = %error, "Request refused");
    } else {
        tracing::error!(participant_id = %sender, operation, error = %error, "Request failed");
    }
}

/// User-facing text for a command that failed.
fn reply_for(error: &SessionError) -> &'static str {
    match error {
        SessionError::AlreadyActive => texts::ALREADY_ACTIVE,
        SessionError::NotFound(_) | SessionError::NotActive(_) => texts::SESSION_NOT_ACTIVE,
        SessionError::NotInitiator(_) => texts::ONLY_INITIATOR,
        SessionError::ParticipantNotFound(_) | SessionError::Infrastructure(_) => {
            texts::GENERIC_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::adapters::memory::{InMemoryParticipantStore, InMemorySessionStore};
    use crate::adapters::telegram::types::Chat;
    use crate::domain::foundation::Timestamp;
    use crate::domain::participant::HiddenParticipantPolicy;
    use crate::ports::MessengerError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Send(i64, String),
        Edit(i64, String),
        Answer(String, String),
    }

    #[derive(Default)]
    struct RecordingMessenger {
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingMessenger {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send(&self, message: &OutboundMessage) -> Result<MessageRef, MessengerError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Send(message.recipient.as_i64(), message.text.clone()));
            Ok(MessageRef::new(message.recipient.as_i64(), 1))
        }

        async fn edit(&self, message: MessageRef, text: &str) -> Result<(), MessengerError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Edit(message.chat_id, text.to_string()));
            Ok(())
        }

        async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), MessengerError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Answer(callback_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    struct Harness {
        router: UpdateRouter,
        messenger: Arc<RecordingMessenger>,
        coordinator: Arc<SessionCoordinator>,
        clock: Arc<ManualClock>,
        next_update: Mutex<i64>,
    }

    fn noon() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap())
    }

    fn harness() -> Harness {
        let clock = Arc::new(ManualClock::new(noon()));
        let participants = Arc::new(InMemoryParticipantStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let messenger = Arc::new(RecordingMessenger::default());
        let remote_status = Arc::new(RemoteStatusManager::new(
            participants.clone(),
            clock.clone(),
            Tz::UTC,
        ));
        let coordinator = Arc::new(SessionCoordinator::new(
            sessions.clone(),
            sessions,
            participants.clone(),
            remote_status.clone(),
            clock.clone(),
        ));
        let services = RouterServices {
            directory: Arc::new(ParticipantDirectory::new(
                participants.clone(),
                HiddenParticipantPolicy::default(),
                clock.clone(),
            )),
            coordinator: coordinator.clone(),
            remote_status,
            notifier: Arc::new(NotificationService::new(messenger.clone(), participants)),
            messenger: messenger.clone(),
            clock: clock.clone(),
        };
        Harness {
            router: UpdateRouter::new(services, ScheduleConfig::default(), Tz::UTC),
            messenger,
            coordinator,
            clock,
            next_update: Mutex::new(1),
        }
    }

    fn user(id: i64, username: &str) -> User {
        User {
            id,
            is_bot: false,
            first_name: username.to_uppercase(),
            last_name: None,
            username: Some(username.to_string()),
        }
    }

    impl Harness {
        fn update_id(&self) -> i64 {
            let mut next = self.next_update.lock().unwrap();
            *next += 1;
            *next
        }

        async fn text(&self, from: User, text: &str) {
            let update = Update {
                update_id: self.update_id(),
                message: Some(Message {
                    message_id: 1,
                    chat: Chat { id: from.id },
                    from: Some(from),
                    text: Some(text.to_string()),
                }),
                callback_query: None,
            };
            self.router.handle(update).await;
        }

        async fn press(&self, from: User, data: &str) {
            let update = Update {
                update_id: self.update_id(),
                message: None,
                callback_query: Some(CallbackQuery {
                    id: format!("cb-{}", from.id),
                    message: Some(Message {
                        message_id: 50,
                        chat: Chat { id: from.id },
                        from: None,
                        text: Some("Invitation".to_string()),
                    }),
                    from,
                    data: Some(data.to_string()),
                }),
            };
            self.router.handle(update).await;
        }

        async fn active_id(&self) -> SessionId {
            self.coordinator.active_session().await.unwrap().unwrap().id()
        }
    }

    #[tokio::test]
    async fn start_command_replies_with_welcome() {
        let h = harness();

        h.text(user(1, "anna"), "/start").await;

        let calls = h.messenger.take();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], Call::Send(1, text) if text.contains("ANNA")));
    }

    #[tokio::test]
    async fn smoke_button_opens_session_and_invites() {
        let h = harness();
        h.text(user(2, "boris"), "/start").await;
        h.messenger.take();

        h.text(user(1, "anna"), texts::START_BUTTON).await;

        let calls = h.messenger.take();
        let recipients: Vec<i64> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Send(to, _) => Some(*to),
                _ => None,
            })
            .collect();
        assert!(recipients.contains(&1));
        assert!(recipients.contains(&2));
        assert!(h.coordinator.active_session().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn smoke_outside_working_hours_is_refused() {
        let h = harness();
        h.clock
            .set(Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 5, 6, 23, 30, 0).unwrap()));

        h.text(user(1, "anna"), "/smoke").await;

        assert_eq!(
            h.messenger.take(),
            vec![Call::Send(1, texts::outside_working_hours(9, 23))]
        );
        assert!(h.coordinator.active_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_smoke_reports_already_active() {
        let h = harness();
        h.text(user(2, "boris"), "/start").await;
        h.text(user(1, "anna"), "/smoke").await;
        h.messenger.take();

        h.text(user(2, "boris"), "/smoke").await;

        assert_eq!(
            h.messenger.take(),
            vec![Call::Send(2, texts::ALREADY_ACTIVE.to_string())]
        );
    }

    #[tokio::test]
    async fn response_button_answers_edits_and_notifies_initiator() {
        let h = harness();
        h.text(user(2, "boris"), "/start").await;
        h.text(user(1, "anna"), "/smoke").await;
        let session_id = h.active_id().await;
        h.messenger.take();

        h.press(user(2, "boris"), &format!("accept:{}", session_id)).await;

        let calls = h.messenger.take();
        let ack = texts::response_ack(ResponseKind::Accepted);
        assert!(calls.contains(&Call::Answer("cb-2".into(), ack.to_string())));
        assert!(calls.contains(&Call::Edit(2, texts::with_footer("Invitation", ack))));
        assert!(calls
            .iter()
            .any(|c| matches!(c, Call::Send(1, text) if text.contains("boris"))));
    }

    #[tokio::test]
    async fn pressing_on_closed_session_marks_message() {
        let h = harness();
        h.text(user(2, "boris"), "/start").await;
        h.text(user(1, "anna"), "/smoke").await;
        let session_id = h.active_id().await;
        h.coordinator.complete_session(session_id).await.unwrap();
        h.messenger.take();

        h.press(user(2, "boris"), &format!("deny:{}", session_id)).await;

        assert_eq!(
            h.messenger.take(),
            vec![
                Call::Answer("cb-2".into(), texts::SESSION_NOT_ACTIVE.to_string()),
                Call::Edit(2, texts::with_footer("Invitation", texts::CLOSED_MARKER)),
            ]
        );
    }

    #[tokio::test]
    async fn cancel_button_only_works_for_initiator() {
        let h = harness();
        h.text(user(2, "boris"), "/start").await;
        h.text(user(1, "anna"), "/smoke").await;
        let session_id = h.active_id().await;
        h.messenger.take();

        h.press(user(2, "boris"), &format!("cancel:{}", session_id)).await;
        assert_eq!(
            h.messenger.take(),
            vec![Call::Answer("cb-2".into(), texts::ONLY_INITIATOR.to_string())]
        );

        h.press(user(1, "anna"), &format!("cancel:{}", session_id)).await;
        let calls = h.messenger.take();
        assert!(calls.contains(&Call::Answer("cb-1".into(), texts::SESSION_CANCELLED.to_string())));
        assert!(calls.contains(&Call::Edit(1, texts::with_footer("Invitation", texts::CANCELLED_MARKER))));

        assert!(h.coordinator.active_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn garbage_callback_data_is_an_invalid_action() {
        let h = harness();

        h.press(user(1, "anna"), "launch:rockets").await;

        assert_eq!(
            h.messenger.take(),
            vec![Call::Answer("cb-1".into(), texts::INVALID_ACTION.to_string())]
        );
    }

    #[tokio::test]
    async fn office_clears_remote_status() {
        let h = harness();
        h.text(user(2, "boris"), "/start").await;
        h.text(user(1, "anna"), "/smoke").await;
        let session_id = h.active_id().await;
        h.press(user(2, "boris"), &format!("remote:{}", session_id)).await;
        h.messenger.take();

        h.text(user(2, "boris"), "/office").await;
        h.text(user(2, "boris"), "/office").await;

        assert_eq!(
            h.messenger.take(),
            vec![
                Call::Send(2, texts::BACK_IN_OFFICE.to_string()),
                Call::Send(2, texts::NOT_REMOTE.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn status_and_cancel_without_session() {
        let h = harness();

        h.text(user(1, "anna"), "/status").await;
        h.text(user(1, "anna"), "/cancel").await;
        h.text(user(1, "anna"), "/dance").await;

        assert_eq!(
            h.messenger.take(),
            vec![
                Call::Send(1, texts::NO_ACTIVE_SESSION.to_string()),
                Call::Send(1, texts::NOTHING_TO_CANCEL.to_string()),
                Call::Send(1, texts::UNKNOWN_COMMAND.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn cancel_command_cancels_own_session() {
        let h = harness();
        h.text(user(2, "boris"), "/start").await;
        h.text(user(1, "anna"), "/smoke").await;
        let session_id = h.active_id().await;
        h.messenger.take();

        h.text(user(1, "anna"), "/cancel").await;

        assert_eq!(
            h.messenger.take(),
            vec![Call::Send(1, texts::SESSION_CANCELLED.to_string())]
        );
        assert!(h.coordinator.active_session().await.unwrap().is_none());
        assert_eq!(
            h.coordinator.cancel_session(session_id, ParticipantId::new(1)).await.unwrap_err(),
            SessionError::NotActive(session_id)
        );
    }
}
