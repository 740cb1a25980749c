//! HTTP handlers for the webhook update source and health probe.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::adapters::telegram::{Update, UpdateRouter};

/// Header Telegram echoes the configured `secret_token` in.
pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

#[derive(Clone)]
pub struct WebhookAppState {
    pub router: Arc<UpdateRouter>,
    pub secret: Option<SecretString>,
}

impl WebhookAppState {
    pub fn new(router: Arc<UpdateRouter>, secret: Option<SecretString>) -> Self {
        Self { router, secret }
    }

    /// Constant-time check of the secret header. Without a configured
    /// secret every request is accepted.
    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.secret else {
            return true;
        };
        let Some(provided) = headers.get(SECRET_HEADER).map(|v| v.as_bytes()) else {
            return false;
        };
        expected.expose_secret().as_bytes().ct_eq(provided).into()
    }
}

/// POST /telegram/webhook
///
/// Acknowledges immediately and handles the update in the background so a
/// slow fan-out never makes Telegram redeliver.
pub async fn receive_update(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !state.is_authorized(&headers) {
        tracing::warn!("Webhook request with missing or wrong secret");
        return StatusCode::UNAUTHORIZED;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed webhook payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    tracing::debug!(update_id = update.update_id, "Webhook update received");
    let router = state.router.clone();
    tokio::spawn(async move { router.handle(update).await });

    StatusCode::OK
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
