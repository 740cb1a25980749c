//! Axum router configuration.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{health, receive_update, WebhookAppState};

/// Create the application router.
///
/// # Routes
///
/// - `POST /telegram/webhook` - Telegram updates (secret header verified)
/// - `GET /health` - liveness probe
pub fn app_router(state: WebhookAppState) -> Router {
    Router::new()
        .route("/telegram/webhook", post(receive_update))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
