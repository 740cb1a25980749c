//! Session domain module.
//!
//! A session is a single proposed break. At most one is active at a time;
//! participants answer it, and it ends either by timing out (completed) or
//! by its initiator cancelling it.

mod aggregate;
mod errors;
mod events;
mod response;
mod summary;

pub use aggregate::Session;
pub use errors::SessionError;
pub use events::SessionEvent;
pub use response::Response;
pub use summary::SessionSummary;
