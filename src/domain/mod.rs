//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, enums, timestamps, errors)
//! - `participant` - Participants, availability and the hidden-user policy
//! - `session` - Session lifecycle, responses, summaries and events
//! - `notification` - Outbound messages and the fan-out policy

pub mod foundation;
pub mod notification;
pub mod participant;
pub mod session;
