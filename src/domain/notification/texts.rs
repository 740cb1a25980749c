//! User-facing message texts.
//!
//! Messages use Telegram's legacy Markdown (`*bold*`). Anything typed by a
//! participant (names in particular) goes through [`escape`] first.

use crate::domain::foundation::ResponseKind;

pub const START_BUTTON: &str = "🚬 Smoke break!";

pub const ACCEPT_LABEL: &str = "✅ Let's go!";
pub const DELAYED_LABEL: &str = "⏱ Within 5 minutes";
pub const DENY_LABEL: &str = "❌ No, thanks";
pub const REMOTE_LABEL: &str = "🏠 I'm remote today";
pub const CANCEL_LABEL: &str = "❌ Cancel smoke break";

pub const NOBODY_TO_INVITE: &str =
    "😔 There is nobody around to invite right now. Enjoy the quiet!";
pub const CANCELLED_BY_INITIATOR: &str = "❌ The smoke break was cancelled by its initiator";
// Markers are appended to already delivered text and sent without formatting.
pub const CANCELLED_MARKER: &str = "❌ Smoke break cancelled";
pub const CLOSED_MARKER: &str = "❌ This smoke break is over";

pub const ALREADY_ACTIVE: &str =
    "⚠️ A smoke break is already going on! Use /status to see who is in";
pub const NO_ACTIVE_SESSION: &str = "📭 No smoke break right now";
pub const NOTHING_TO_CANCEL: &str = "📭 There is no active smoke break to cancel";
pub const ONLY_INITIATOR: &str = "⛔️ Only the initiator can cancel the smoke break";
pub const SESSION_CANCELLED: &str = "✅ Smoke break cancelled!";
pub const SESSION_NOT_ACTIVE: &str = "❌ This smoke break is no longer active";
pub const INVALID_ACTION: &str = "Invalid action";
pub const GENERIC_FAILURE: &str = "❌ Something went wrong. Please try again later";

pub const NOT_REMOTE: &str = "✅ You are not marked as remote. You will get invitations as usual!";
pub const BACK_IN_OFFICE: &str =
    "🏢 Welcome back to the office! You will get smoke break invitations again.";
pub const UNKNOWN_COMMAND: &str = "Unknown command. Use /help to see what I can do";

/// Escapes legacy Markdown control characters.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn welcome(first_name: &str) -> String {
    format!(
        "👋 Welcome to the smoke break bot, {}!\n\n\
         This bot helps you gather colleagues for a smoke break.\n\n\
         Use /smoke or the button below to invite others\n\
         Use /status to see the current smoke break\n\
         Use /help for more information",
        escape(first_name)
    )
}

pub fn help(work_start_hour: u32, work_end_hour: u32) -> String {
    format!(
        "*Smoke break bot help*\n\n\
         *Commands:*\n\
         /start - Activate the bot and show the menu\n\
         /smoke - Invite colleagues for a smoke break\n\
         /status - Show the current smoke break\n\
         /cancel - Cancel the current smoke break (initiator only)\n\
         /office - Back in the office (clear the remote status)\n\
         /help - Show this help\n\n\
         *How it works:*\n\
         1. Press \"{start}\" or use /smoke\n\
         2. Your colleagues get an invitation\n\
         3. They answer with one of:\n\
         \u{20}  • {accept} - join right away\n\
         \u{20}  • {delayed} - join a bit later\n\
         \u{20}  • {deny} - skip this one\n\
         \u{20}  • {remote} - no more invitations until tomorrow\n\n\
         *Working hours:*\n\
         Smoke breaks can be started between {from:02}:00 and {to:02}:00.",
        start = START_BUTTON,
        accept = ACCEPT_LABEL,
        delayed = DELAYED_LABEL,
        deny = DENY_LABEL,
        remote = REMOTE_LABEL,
        from = work_start_hour,
        to = work_end_hour,
    )
}

pub fn outside_working_hours(work_start_hour: u32, work_end_hour: u32) -> String {
    format!(
        "⏰ Sorry, it is not smoke break time. Try again during working hours ({:02}:00 - {:02}:00).",
        work_start_hour, work_end_hour
    )
}

/// Invitation body. `None` when the initiator must not be named.
pub fn invitation(initiator: Option<&str>) -> String {
    match initiator {
        Some(name) => format!("🚬 {} invites you for a smoke break!\n\nComing?", name),
        None => "🚬 You are invited for a smoke break!\n\nComing?".to_string(),
    }
}

pub fn started(invited: usize) -> String {
    format!(
        "✅ Smoke break started! Invitations sent to {} {}...\n\n\
         Use /cancel or the button below to cancel.",
        invited,
        if invited == 1 { "colleague" } else { "colleagues" }
    )
}

/// Notice sent to interested participants when someone answers.
pub fn response_notice(name: &str, kind: ResponseKind) -> String {
    match kind {
        ResponseKind::Accepted => format!("✅ {} is coming!", name),
        ResponseKind::AcceptedDelayed => format!("⏱ {} will come within 5 minutes!", name),
        ResponseKind::Denied => format!("❌ {} is not coming", name),
        ResponseKind::Remote => format!("🏠 {} is working remotely today", name),
    }
}

/// Acknowledgement shown to the participant who answered.
pub fn response_ack(kind: ResponseKind) -> &'static str {
    match kind {
        ResponseKind::Accepted => "✅ Great! See you there!",
        ResponseKind::AcceptedDelayed => "⏱ Got it! See you within 5 minutes!",
        ResponseKind::Denied => "👌 Okay! Next time then.",
        ResponseKind::Remote => {
            "🏠 Remote today. No more invitations until tomorrow.\n\nUse /office when you are back."
        }
    }
}

pub fn auto_completed(final_summary: &str) -> String {
    format!("⏰ *The smoke break is over*\n\n{}", final_summary)
}

/// Appends a marker line to an existing message body.
pub fn with_footer(original: &str, footer: &str) -> String {
    if original.is_empty() {
        footer.to_string()
    } else {
        format!("{}\n\n{}", original, footer)
    }
}
