//! In-memory adapters - Repository implementations without a database.
//!
//! Used when no database is configured and throughout the test suite.

mod participant_store;
mod session_store;

pub use participant_store::InMemoryParticipantStore;
pub use session_store::InMemorySessionStore;
