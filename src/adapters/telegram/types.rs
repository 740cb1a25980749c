//! Telegram Bot API wire types.
//!
//! Only the fields the bot reads or writes are modelled; unknown fields in
//! incoming JSON are ignored.

use serde::{Deserialize, Serialize};

use crate::domain::notification::{Action, Markup};
use crate::domain::participant::ParticipantProfile;

// ════════════════════════════════════════════════════════════════════════════════
// Incoming
// ════════════════════════════════════════════════════════════════════════════════

/// Envelope of every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    pub fn profile(&self) -> ParticipantProfile {
        ParticipantProfile::new(
            self.username.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    /// Bot command without the slash or `@botname` suffix, if the text is one.
    pub fn command(&self) -> Option<&str> {
        let text = self.text.as_deref()?.trim_start();
        let word = text.strip_prefix('/')?.split_whitespace().next()?;
        let command = word.split('@').next().unwrap_or(word);
        if command.is_empty() {
            None
        } else {
            Some(command)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Outgoing
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditMessageTextRequest<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerCallbackQueryRequest<'a> {
    pub callback_query_id: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Inline {
        inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
    },
    Keyboard {
        keyboard: Vec<Vec<KeyboardButton>>,
        resize_keyboard: bool,
    },
}

impl ReplyMarkup {
    pub fn from_markup(markup: &Markup) -> Option<Self> {
        match markup {
            Markup::None => None,
            Markup::Actions(rows) => Some(ReplyMarkup::Inline {
                inline_keyboard: rows
                    .iter()
                    .map(|row| row.iter().map(InlineKeyboardButton::from).collect())
                    .collect(),
            }),
            Markup::Shortcuts(labels) => Some(ReplyMarkup::Keyboard {
                keyboard: labels
                    .iter()
                    .map(|label| vec![KeyboardButton { text: label.clone() }])
                    .collect(),
                resize_keyboard: true,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl From<&Action> for InlineKeyboardButton {
    fn from(action: &Action) -> Self {
        Self {
            text: action.label.clone(),
            callback_data: action.token.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::notification::{response_actions, ActionOp};
    use serde_json::json;

    fn message(text: &str) -> Message {
        Message {
            message_id: 1,
            from: None,
            chat: Chat { id: 5 },
            text: Some(text.to_string()),
        }
    }

    #[test]
    fn command_strips_slash_and_bot_name() {
        assert_eq!(message("/smoke").command(), Some("smoke"));
        assert_eq!(message("/status@smoke_bot now").command(), Some("status"));
        assert_eq!(message("hello").command(), None);
        assert_eq!(message("/").command(), None);
    }

    #[test]
    fn parses_callback_update() {
        let raw = json!({
            "update_id": 10,
            "callback_query": {
                "id": "cb-1",
                "from": { "id": 42, "is_bot": false, "first_name": "Anna", "username": "anna" },
                "message": { "message_id": 7, "chat": { "id": 42 }, "text": "Coming?" },
                "data": "accept:3",
                "chat_instance": "ignored"
            }
        });

        let update: Update = serde_json::from_value(raw).unwrap();
        let query = update.callback_query.unwrap();

        assert_eq!(query.data.as_deref(), Some("accept:3"));
        assert_eq!(query.from.profile().username.as_deref(), Some("anna"));
        assert!(update.message.is_none());
    }

    #[test]
    fn inline_markup_serializes_callback_tokens() {
        let markup = ReplyMarkup::from_markup(&Markup::Actions(response_actions(SessionId::new(9))))
            .unwrap();
        let value = serde_json::to_value(&markup).unwrap();

        assert_eq!(value["inline_keyboard"][0][0]["callback_data"], "accept:9");
        assert_eq!(value["inline_keyboard"][1][1]["callback_data"], "remote:9");
        assert_eq!(
            value["inline_keyboard"][1][0]["callback_data"],
            format!("{}:9", ActionOp::Deny.as_str())
        );
    }

    #[test]
    fn shortcut_markup_is_a_resized_reply_keyboard() {
        let markup = ReplyMarkup::from_markup(&Markup::Shortcuts(vec!["Go".into()])).unwrap();
        let value = serde_json::to_value(&markup).unwrap();

        assert_eq!(value["keyboard"][0][0]["text"], "Go");
        assert_eq!(value["resize_keyboard"], true);
        assert!(ReplyMarkup::from_markup(&Markup::None).is_none());
    }
}
