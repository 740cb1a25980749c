//! Visibility policy applied by the directory on every create/update.

use super::Participant;

/// Username forced hidden unless configured otherwise.
pub const DEFAULT_HIDDEN_USERNAME: &str = "eyerise";

/// Forces participants with a reserved username to be hidden.
///
/// The flag is not user-controllable: it is re-evaluated on every write so a
/// participant cannot unhide themselves by interacting again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenParticipantPolicy {
    reserved_username: String,
}

impl HiddenParticipantPolicy {
    pub fn new(reserved_username: impl Into<String>) -> Self {
        Self {
            reserved_username: reserved_username.into(),
        }
    }

    /// Returns true if the username is reserved (case-insensitive).
    pub fn is_reserved(&self, username: Option<&str>) -> bool {
        username
            .map(|u| u.eq_ignore_ascii_case(&self.reserved_username))
            .unwrap_or(false)
    }

    /// Applies the policy in place.
    pub fn apply(&self, participant: &mut Participant) {
        if self.is_reserved(participant.username()) {
            participant.hide();
        }
    }
}

impl Default for HiddenParticipantPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_HIDDEN_USERNAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ParticipantId, Timestamp};
    use crate::domain::participant::ParticipantProfile;

    fn participant(username: Option<&str>) -> Participant {
        Participant::new(
            ParticipantId::new(5),
            ParticipantProfile::new(username.map(String::from), "Eve", None),
            Timestamp::from_unix_secs(0),
        )
    }

    #[test]
    fn reserved_username_is_hidden() {
        let mut p = participant(Some("eyerise"));
        HiddenParticipantPolicy::default().apply(&mut p);
        assert!(p.is_hidden());
    }

    #[test]
    fn match_ignores_case() {
        let mut p = participant(Some("EyeRise"));
        HiddenParticipantPolicy::default().apply(&mut p);
        assert!(p.is_hidden());
    }

    #[test]
    fn other_usernames_stay_visible() {
        let policy = HiddenParticipantPolicy::new("ghost");
        let mut named = participant(Some("eyerise"));
        let mut anonymous = participant(None);
        policy.apply(&mut named);
        policy.apply(&mut anonymous);
        assert!(!named.is_hidden());
        assert!(!anonymous.is_hidden());
    }
}
