//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `ParticipantRepository` - Participant directory storage
//! - `SessionRepository` - Sessions, with the single-active guarantee
//! - `ResponseRepository` - Per-participant answers with upsert semantics
//!
//! ## Infrastructure Ports
//!
//! - `Messenger` - Outbound chat transport
//! - `Clock` - Source of the current time

mod clock;
mod messenger;
mod participant_repository;
mod response_repository;
mod session_repository;

pub use clock::Clock;
pub use messenger::{MessageRef, Messenger, MessengerError};
pub use participant_repository::ParticipantRepository;
pub use response_repository::ResponseRepository;
pub use session_repository::SessionRepository;
