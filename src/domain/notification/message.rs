//! Transport-neutral outbound message.

use super::Action;
use crate::domain::foundation::ParticipantId;

/// Extra controls attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Markup {
    #[default]
    None,
    /// Buttons attached to the message itself, one inner `Vec` per row.
    Actions(Vec<Vec<Action>>),
    /// Persistent shortcut buttons that send their label as plain text.
    Shortcuts(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: ParticipantId,
    pub text: String,
    pub markup: Markup,
}

impl OutboundMessage {
    pub fn text(recipient: ParticipantId, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            markup: Markup::None,
        }
    }

    pub fn with_actions(mut self, rows: Vec<Vec<Action>>) -> Self {
        self.markup = Markup::Actions(rows);
        self
    }

    pub fn with_shortcuts(mut self, labels: Vec<String>) -> Self {
        self.markup = Markup::Shortcuts(labels);
        self
    }

    /// Every action attached to the message, in row order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        let rows: &[Vec<Action>] = match &self.markup {
            Markup::Actions(rows) => rows,
            _ => &[],
        };
        rows.iter().flatten()
    }
}
