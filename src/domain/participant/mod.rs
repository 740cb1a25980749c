//! Participant domain module.
//!
//! The roster of people the bot can invite, their availability flags, and
//! the visibility policy that keeps reserved accounts out of every output.

mod entity;
mod policy;
mod roster;

pub use entity::{Participant, ParticipantProfile};
pub use policy::{HiddenParticipantPolicy, DEFAULT_HIDDEN_USERNAME};
pub use roster::Roster;
