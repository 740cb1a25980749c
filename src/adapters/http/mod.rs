//! HTTP adapter - webhook update source and health endpoint.

mod handlers;
mod routes;

pub use handlers::{WebhookAppState, SECRET_HEADER};
pub use routes::app_router;
