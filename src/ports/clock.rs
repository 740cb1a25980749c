//! Clock port.
//!
//! Everything time-dependent (session staleness, remote expiry, working
//! hours) reads the current instant through this port so tests can move time
//! by hand.

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
