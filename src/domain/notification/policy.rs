//! Who hears about a session event, and what they are told.
//!
//! Pure: the plan depends only on the event and the roster snapshot, so it is
//! unit-testable without a transport. Delivery lives in the application layer.
//!
//! | Event | Recipients |
//! |-------|------------|
//! | Started | each invitee (invitation) + initiator (confirmation) |
//! | NobodyToInvite | initiator |
//! | Responded, attending | initiator + other attending respondents |
//! | Responded, not attending | initiator |
//! | Cancelled | every respondent except the canceller |
//! | AutoCompleted | initiator + attending respondents |
//!
//! Across every row, hidden participants are never recipients and never
//! named, a responder never hears about their own answer, and nobody gets
//! the same notification twice.

use std::collections::HashSet;

use super::texts;
use super::{Action, ActionOp, OutboundMessage};
use crate::domain::foundation::{ParticipantId, SessionId};
use crate::domain::participant::Roster;
use crate::domain::session::{Response, SessionEvent, SessionSummary};

/// Stateless notification planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationPolicy;

impl NotificationPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Translates an event into the messages to deliver.
    pub fn plan(&self, event: &SessionEvent, roster: &Roster) -> Vec<OutboundMessage> {
        match event {
            SessionEvent::Started { session, invitees } => {
                let initiator = session.initiator_id();
                let initiator_name = roster
                    .visible(initiator)
                    .map(|p| texts::escape(&p.mention()));

                let mut recipients = Recipients::new(roster);
                recipients.exclude(initiator);
                let invitation = texts::invitation(initiator_name.as_deref());
                let mut out: Vec<OutboundMessage> = invitees
                    .iter()
                    .filter(|id| recipients.admit(**id))
                    .map(|id| {
                        OutboundMessage::text(*id, invitation.clone())
                            .with_actions(response_actions(session.id()))
                    })
                    .collect();

                if !roster.is_hidden(initiator) {
                    let confirmation = OutboundMessage::text(initiator, texts::started(out.len()))
                        .with_actions(vec![vec![Action::new(
                            texts::CANCEL_LABEL,
                            ActionOp::Cancel,
                            session.id(),
                        )]]);
                    out.push(confirmation);
                }
                out
            }

            SessionEvent::NobodyToInvite { session } => {
                let mut recipients = Recipients::new(roster);
                if recipients.admit(session.initiator_id()) {
                    vec![OutboundMessage::text(
                        session.initiator_id(),
                        texts::NOBODY_TO_INVITE,
                    )]
                } else {
                    Vec::new()
                }
            }

            SessionEvent::Responded {
                session,
                responder,
                kind,
                responses,
            } => {
                // Hidden or unregistered responders produce nothing at all.
                let Some(participant) = roster.visible(*responder) else {
                    return Vec::new();
                };
                let body = texts::response_notice(&texts::escape(&participant.mention()), *kind);

                let mut recipients = Recipients::new(roster);
                recipients.exclude(*responder);

                let mut targets = Vec::new();
                if recipients.admit(session.initiator_id()) {
                    targets.push(session.initiator_id());
                }
                if kind.is_attending() {
                    targets.extend(attending(responses).filter(|id| recipients.admit(*id)));
                }

                targets
                    .into_iter()
                    .map(|id| OutboundMessage::text(id, body.clone()))
                    .collect()
            }

            SessionEvent::Cancelled {
                cancelled_by,
                responses,
                ..
            } => {
                let mut recipients = Recipients::new(roster);
                recipients.exclude(*cancelled_by);
                responses
                    .iter()
                    .map(|r| r.participant_id)
                    .filter(|id| recipients.admit(*id))
                    .map(|id| OutboundMessage::text(id, texts::CANCELLED_BY_INITIATOR))
                    .collect()
            }

            SessionEvent::AutoCompleted { session, responses } => {
                let summary = SessionSummary::build(responses, roster);
                let body = texts::auto_completed(&summary.render_final());

                let mut recipients = Recipients::new(roster);
                std::iter::once(session.initiator_id())
                    .chain(attending(responses))
                    .filter(|id| recipients.admit(*id))
                    .map(|id| OutboundMessage::text(id, body.clone()))
                    .collect()
            }
        }
    }
}

/// The four answer buttons, two per row.
pub fn response_actions(session_id: SessionId) -> Vec<Vec<Action>> {
    vec![
        vec![
            Action::new(texts::ACCEPT_LABEL, ActionOp::Accept, session_id),
            Action::new(texts::DELAYED_LABEL, ActionOp::Delayed, session_id),
        ],
        vec![
            Action::new(texts::DENY_LABEL, ActionOp::Deny, session_id),
            Action::new(texts::REMOTE_LABEL, ActionOp::Remote, session_id),
        ],
    ]
}

fn attending(responses: &[Response]) -> impl Iterator<Item = ParticipantId> + '_ {
    responses
        .iter()
        .filter(|r| r.is_attending())
        .map(|r| r.participant_id)
}

/// Deduplicating recipient filter that drops hidden participants.
struct Recipients<'a> {
    roster: &'a Roster,
    seen: HashSet<ParticipantId>,
}

impl<'a> Recipients<'a> {
    fn new(roster: &'a Roster) -> Self {
        Self {
            roster,
            seen: HashSet::new(),
        }
    }

    fn exclude(&mut self, id: ParticipantId) {
        self.seen.insert(id);
    }

    /// True the first time a visible participant is offered.
    fn admit(&mut self, id: ParticipantId) -> bool {
        !self.roster.is_hidden(id) && self.seen.insert(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ResponseKind, Timestamp};
    use crate::domain::participant::{HiddenParticipantPolicy, Participant, ParticipantProfile};
    use crate::domain::session::Session;

    const A: ParticipantId = ParticipantId::new(1);
    const B: ParticipantId = ParticipantId::new(2);
    const C: ParticipantId = ParticipantId::new(3);
    const D: ParticipantId = ParticipantId::new(4);
    const E: ParticipantId = ParticipantId::new(5);

    fn person(id: ParticipantId, username: &str) -> Participant {
        let mut p = Participant::new(
            id,
            ParticipantProfile::new(Some(username.to_string()), username, None),
            Timestamp::from_unix_secs(0),
        );
        HiddenParticipantPolicy::default().apply(&mut p);
        p
    }

    fn roster() -> Roster {
        Roster::new(vec![
            person(A, "anna"),
            person(B, "boris"),
            person(C, "clara"),
            person(D, "dima"),
            person(E, "eyerise"),
        ])
    }

    fn session(initiator: ParticipantId) -> Session {
        Session::open(SessionId::new(7), initiator, Timestamp::from_unix_secs(100))
    }

    fn answer(id: ParticipantId, kind: ResponseKind) -> Response {
        Response::new(SessionId::new(7), id, kind, Timestamp::from_unix_secs(110))
    }

    fn recipients(messages: &[OutboundMessage]) -> Vec<ParticipantId> {
        messages.iter().map(|m| m.recipient).collect()
    }

    #[test]
    fn started_invites_everyone_and_confirms_to_initiator() {
        let event = SessionEvent::Started {
            session: session(A),
            invitees: vec![B, C],
        };

        let plan = NotificationPolicy::new().plan(&event, &roster());

        assert_eq!(recipients(&plan), vec![B, C, A]);
        assert!(plan[0].text.contains("@anna invites you"));
        assert_eq!(plan[0].actions().count(), 4);
        assert!(plan[2].text.contains("2 colleagues"));
        let cancel: Vec<_> = plan[2].actions().collect();
        assert_eq!(cancel.len(), 1);
        assert_eq!(cancel[0].token.to_string(), "cancel:7");
    }

    #[test]
    fn started_never_invites_hidden_participants() {
        let event = SessionEvent::Started {
            session: session(A),
            invitees: vec![B, E],
        };

        let plan = NotificationPolicy::new().plan(&event, &roster());

        assert_eq!(recipients(&plan), vec![B, A]);
        assert!(plan[1].text.contains("1 colleague"));
    }

    #[test]
    fn hidden_initiator_is_not_named_or_confirmed() {
        let event = SessionEvent::Started {
            session: session(E),
            invitees: vec![A, B],
        };

        let plan = NotificationPolicy::new().plan(&event, &roster());

        assert_eq!(recipients(&plan), vec![A, B]);
        assert!(plan.iter().all(|m| !m.text.contains("eyerise")));
    }

    #[test]
    fn nobody_to_invite_goes_to_initiator_only() {
        let event = SessionEvent::NobodyToInvite { session: session(A) };
        let plan = NotificationPolicy::new().plan(&event, &roster());

        assert_eq!(recipients(&plan), vec![A]);
        assert_eq!(plan[0].text, texts::NOBODY_TO_INVITE);
    }

    #[test]
    fn accepted_response_reaches_initiator_and_other_attendees() {
        let event = SessionEvent::Responded {
            session: session(A),
            responder: C,
            kind: ResponseKind::Accepted,
            responses: vec![
                answer(B, ResponseKind::AcceptedDelayed),
                answer(D, ResponseKind::Denied),
                answer(E, ResponseKind::Accepted),
                answer(C, ResponseKind::Accepted),
            ],
        };

        let plan = NotificationPolicy::new().plan(&event, &roster());

        assert_eq!(recipients(&plan), vec![A, B]);
        assert!(plan.iter().all(|m| m.text == "✅ @clara is coming!"));
    }

    #[test]
    fn attending_initiator_is_notified_once() {
        let event = SessionEvent::Responded {
            session: session(A),
            responder: B,
            kind: ResponseKind::Accepted,
            responses: vec![
                answer(A, ResponseKind::Accepted),
                answer(B, ResponseKind::Accepted),
            ],
        };

        let plan = NotificationPolicy::new().plan(&event, &roster());

        assert_eq!(recipients(&plan), vec![A]);
    }

    #[test]
    fn declines_reach_only_the_initiator() {
        let event = SessionEvent::Responded {
            session: session(A),
            responder: D,
            kind: ResponseKind::Remote,
            responses: vec![
                answer(B, ResponseKind::Accepted),
                answer(D, ResponseKind::Remote),
            ],
        };

        let plan = NotificationPolicy::new().plan(&event, &roster());

        assert_eq!(recipients(&plan), vec![A]);
        assert!(plan[0].text.contains("@dima is working remotely"));
    }

    #[test]
    fn initiator_answering_own_session_notifies_nobody_else_on_decline() {
        let event = SessionEvent::Responded {
            session: session(A),
            responder: A,
            kind: ResponseKind::Denied,
            responses: vec![answer(A, ResponseKind::Denied)],
        };

        assert!(NotificationPolicy::new().plan(&event, &roster()).is_empty());
    }

    #[test]
    fn hidden_responder_produces_nothing() {
        let event = SessionEvent::Responded {
            session: session(A),
            responder: E,
            kind: ResponseKind::Accepted,
            responses: vec![
                answer(B, ResponseKind::Accepted),
                answer(E, ResponseKind::Accepted),
            ],
        };

        assert!(NotificationPolicy::new().plan(&event, &roster()).is_empty());
    }

    #[test]
    fn cancellation_reaches_every_visible_respondent_but_canceller() {
        let event = SessionEvent::Cancelled {
            session: session(A),
            cancelled_by: A,
            responses: vec![
                answer(B, ResponseKind::Accepted),
                answer(D, ResponseKind::Denied),
                answer(E, ResponseKind::Accepted),
                answer(A, ResponseKind::Accepted),
            ],
        };

        let plan = NotificationPolicy::new().plan(&event, &roster());

        assert_eq!(recipients(&plan), vec![B, D]);
    }

    #[test]
    fn auto_completion_goes_to_initiator_and_attendees_once() {
        let event = SessionEvent::AutoCompleted {
            session: session(A),
            responses: vec![
                answer(A, ResponseKind::Accepted),
                answer(B, ResponseKind::AcceptedDelayed),
                answer(C, ResponseKind::Denied),
                answer(E, ResponseKind::Accepted),
            ],
        };

        let plan = NotificationPolicy::new().plan(&event, &roster());

        assert_eq!(recipients(&plan), vec![A, B]);
        assert!(plan[0].text.contains("Were there"));
        assert!(plan[0].text.contains("@boris"));
        assert!(!plan[0].text.contains("eyerise"));
    }
}
