//! Grouped view of who answered what.

use serde::Serialize;

use super::Response;
use crate::domain::foundation::ResponseKind;
use crate::domain::notification::texts;
use crate::domain::participant::Roster;

/// Respondents of one session grouped by answer.
///
/// Names are kept raw; rendering escapes them for Markdown.
///
/// Hidden participants and participants unknown to the roster are never
/// listed. `Remote` answers are left out: the participant is away, not
/// declining this particular break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub coming: Vec<String>,
    pub coming_late: Vec<String>,
    pub declined: Vec<String>,
}

impl SessionSummary {
    /// Builds the summary, preserving the order of `responses`.
    pub fn build(responses: &[Response], roster: &Roster) -> Self {
        let mut summary = Self::default();

        for response in responses {
            let Some(participant) = roster.visible(response.participant_id) else {
                continue;
            };
            let name = participant.mention();
            match response.kind {
                ResponseKind::Accepted => summary.coming.push(name),
                ResponseKind::AcceptedDelayed => summary.coming_late.push(name),
                ResponseKind::Denied => summary.declined.push(name),
                ResponseKind::Remote => {}
            }
        }

        summary
    }

    pub fn is_empty(&self) -> bool {
        self.coming.is_empty() && self.coming_late.is_empty() && self.declined.is_empty()
    }

    /// Live status of an open session.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "Nobody has answered yet".to_string();
        }

        let mut out = String::from("📊 *Smoke break status:*\n\n");
        push_group(&mut out, "✅ *Going now:*", &self.coming);
        push_group(&mut out, "⏱ *Coming within 5 minutes:*", &self.coming_late);
        push_group(&mut out, "❌ *Not going:*", &self.declined);
        out.trim_end().to_string()
    }

    /// Past-tense recap sent when a session closes on its own.
    pub fn render_final(&self) -> String {
        if self.coming.is_empty() && self.coming_late.is_empty() {
            return "Nobody came".to_string();
        }

        let mut out = String::from("📊 *Smoke break results:*\n\n");
        push_group(&mut out, "✅ *Were there:*", &self.coming);
        push_group(&mut out, "⏱ *Came later:*", &self.coming_late);
        out.trim_end().to_string()
    }
}

fn push_group(out: &mut String, title: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    out.push_str(title);
    out.push('\n');
    for name in names {
        out.push_str("  • ");
        out.push_str(&texts::escape(name));
        out.push('\n');
    }
    out.push('\n');
}
