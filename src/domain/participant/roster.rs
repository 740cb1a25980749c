//! Read-only snapshot of the directory used by summaries and notifications.

use std::collections::HashMap;

use super::Participant;
use crate::domain::foundation::ParticipantId;

/// Participants indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: HashMap<ParticipantId, Participant>,
}

impl Roster {
    pub fn new(participants: impl IntoIterator<Item = Participant>) -> Self {
        Self {
            participants: participants.into_iter().map(|p| (p.id(), p)).collect(),
        }
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    /// Visible participant by id; `None` for hidden or unknown ids.
    pub fn visible(&self, id: ParticipantId) -> Option<&Participant> {
        self.get(id).filter(|p| !p.is_hidden())
    }

    /// Whether the participant is hidden. Unknown ids count as visible,
    /// matching a participant the directory has not recorded yet.
    pub fn is_hidden(&self, id: ParticipantId) -> bool {
        self.get(id).map(Participant::is_hidden).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::participant::{HiddenParticipantPolicy, ParticipantProfile};

    #[test]
    fn visible_skips_hidden_and_unknown() {
        let mut hidden = Participant::new(
            ParticipantId::new(1),
            ParticipantProfile::new(Some("eyerise".into()), "E", None),
            Timestamp::from_unix_secs(0),
        );
        HiddenParticipantPolicy::default().apply(&mut hidden);
        let shown = Participant::new(
            ParticipantId::new(2),
            ParticipantProfile::new(Some("bob".into()), "Bob", None),
            Timestamp::from_unix_secs(0),
        );
        let roster = Roster::new(vec![hidden, shown]);

        assert!(roster.visible(ParticipantId::new(1)).is_none());
        assert!(roster.visible(ParticipantId::new(2)).is_some());
        assert!(roster.visible(ParticipantId::new(3)).is_none());
        assert!(roster.is_hidden(ParticipantId::new(1)));
        assert!(!roster.is_hidden(ParticipantId::new(3)));
        assert_eq!(roster.len(), 2);
    }
}
