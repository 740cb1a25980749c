//! Application layer - services that orchestrate the domain over the ports.
//!
//! - `ParticipantDirectory` - registration and roster lookups
//! - `RemoteStatusManager` - the "remote today" flag
//! - `SessionCoordinator` - session lifecycle, the only writer of session state
//! - `NotificationService` - fan-out of planned notifications
//! - `SessionReaper` - periodic auto-completion and startup recovery

mod coordinator;
mod directory;
mod notifier;
mod reaper;
mod remote_status;

pub use coordinator::SessionCoordinator;
pub use directory::ParticipantDirectory;
pub use notifier::{DeliveryReport, NotificationService};
pub use reaper::{SessionReaper, SessionReaperConfig};
pub use remote_status::RemoteStatusManager;
