//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-process repositories (tests, database-less runs)
//! - `postgres` - PostgreSQL repositories
//! - `telegram` - Bot API client, update router and long-polling source
//! - `http` - Webhook and health endpoints
//! - `clock` - System and manual clocks

pub mod clock;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod telegram;

pub use clock::{ManualClock, SystemClock};
