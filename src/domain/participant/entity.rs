//! Participant entity.
//!
//! A participant is anyone who has interacted with the bot. The record is
//! upserted on every inbound interaction and carries the availability flags
//! the coordinator filters invitations by.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ParticipantId, Timestamp};

/// Identity fields reported by the messaging platform on each interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl ParticipantProfile {
    /// Creates a profile, normalizing empty usernames to `None`.
    pub fn new(
        username: Option<String>,
        first_name: impl Into<String>,
        last_name: Option<String>,
    ) -> Self {
        Self {
            username: username.filter(|u| !u.trim().is_empty()),
            first_name: first_name.into(),
            last_name: last_name.filter(|l| !l.trim().is_empty()),
        }
    }
}

/// A registered participant.
///
/// # Invariants
///
/// - `remote_until` is `Some` only while `is_remote_today` is set
/// - hidden participants are never shown or notified (enforced by readers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    username: Option<String>,
    first_name: String,
    last_name: Option<String>,
    is_remote_today: bool,
    remote_until: Option<Timestamp>,
    is_hidden: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Participant {
    /// Creates a new, visible, in-office participant.
    pub fn new(id: ParticipantId, profile: ParticipantProfile, now: Timestamp) -> Self {
        Self {
            id,
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            is_remote_today: false,
            remote_until: None,
            is_hidden: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a participant from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ParticipantId,
        username: Option<String>,
        first_name: String,
        last_name: Option<String>,
        is_remote_today: bool,
        remote_until: Option<Timestamp>,
        is_hidden: bool,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            username,
            first_name,
            last_name,
            is_remote_today,
            remote_until,
            is_hidden,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn is_remote_today(&self) -> bool {
        self.is_remote_today
    }

    pub fn remote_until(&self) -> Option<Timestamp> {
        self.remote_until
    }

    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Name shown to other participants: the username, or the first name
    /// when no username is set.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }

    /// Name as rendered in messages (`@username` or plain first name).
    pub fn mention(&self) -> String {
        match &self.username {
            Some(username) => format!("@{}", username),
            None => self.first_name.clone(),
        }
    }

    /// Whether the participant should receive invitations at `now`.
    pub fn is_available(&self, now: &Timestamp) -> bool {
        !self.is_hidden && !self.is_remote_at(now)
    }

    /// Remote status that has not yet expired at `now`.
    pub fn is_remote_at(&self, now: &Timestamp) -> bool {
        match self.remote_until {
            Some(until) => self.is_remote_today && !until.is_before(now),
            None => self.is_remote_today,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Refreshes the identity fields from the latest interaction.
    pub fn apply_profile(&mut self, profile: ParticipantProfile, now: Timestamp) {
        self.username = profile.username;
        self.first_name = profile.first_name;
        self.last_name = profile.last_name;
        self.updated_at = now;
    }

    /// Marks the participant remote until the given instant.
    pub fn mark_remote_until(&mut self, until: Timestamp, now: Timestamp) {
        self.is_remote_today = true;
        self.remote_until = Some(until);
        self.updated_at = now;
    }

    /// Clears remote status. Returns whether the participant was remote.
    pub fn clear_remote(&mut self, now: Timestamp) -> bool {
        let was_remote = self.is_remote_today;
        self.is_remote_today = false;
        self.remote_until = None;
        self.updated_at = now;
        was_remote
    }

    /// Forces the participant hidden. Only the directory policy calls this.
    pub(crate) fn hide(&mut self) {
        self.is_hidden = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs)
    }

    fn participant(username: Option<&str>) -> Participant {
        Participant::new(
            ParticipantId::new(1),
            ParticipantProfile::new(username.map(String::from), "Anna", None),
            ts(1_000),
        )
    }

    #[test]
    fn display_name_prefers_username() {
        assert_eq!(participant(Some("anna_k")).display_name(), "anna_k");
        assert_eq!(participant(Some("anna_k")).mention(), "@anna_k");
    }

    #[test]
    fn display_name_falls_back_to_first_name() {
        assert_eq!(participant(None).display_name(), "Anna");
        assert_eq!(participant(None).mention(), "Anna");
    }

    #[test]
    fn empty_username_is_treated_as_absent() {
        let profile = ParticipantProfile::new(Some("  ".into()), "Anna", Some(String::new()));
        assert!(profile.username.is_none());
        assert!(profile.last_name.is_none());
    }

    #[test]
    fn remote_participant_is_unavailable_until_expiry() {
        let mut p = participant(Some("anna_k"));
        p.mark_remote_until(ts(2_000), ts(1_500));

        assert!(!p.is_available(&ts(1_999)));
        assert!(!p.is_available(&ts(2_000)));
        assert!(p.is_available(&ts(2_001)));
    }

    #[test]
    fn clear_remote_reports_previous_state() {
        let mut p = participant(None);
        assert!(!p.clear_remote(ts(1_100)));

        p.mark_remote_until(ts(2_000), ts(1_200));
        assert!(p.clear_remote(ts(1_300)));
        assert!(!p.is_remote_today());
        assert!(p.remote_until().is_none());
        assert_eq!(p.updated_at(), &ts(1_300));
    }

    #[test]
    fn hidden_participant_is_never_available() {
        let mut p = participant(None);
        p.hide();
        assert!(!p.is_available(&ts(1_000)));
    }
}
