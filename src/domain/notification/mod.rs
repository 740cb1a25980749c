//! Notification domain module.
//!
//! Transport-neutral messages, the button action tokens they carry, and the
//! policy that turns a [`SessionEvent`](crate::domain::session::SessionEvent)
//! into a fan-out plan.

mod action;
mod message;
mod policy;
pub mod texts;

pub use action::{Action, ActionOp, ActionParseError, ActionToken};
pub use message::{Markup, OutboundMessage};
pub use policy::{response_actions, NotificationPolicy};
