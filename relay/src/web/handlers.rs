//! Alert webhook endpoint handlers.
//!
//! The webhook handler is a single linear pass:
//! Authenticate → Normalize → Validate → Truncate → Send → Respond,
//! with early exits at Authenticate and Validate. The token is checked
//! before the body is parsed or logged.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::notify::{clip, send_to_all, Notifier};
use crate::web::auth::verify_webhook_token;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(config: Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config: Arc::new(config),
            notifier,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/send/test", get(send_test))
        .route("/webhook", post(webhook))
        .with_state(state)
}

// =============================================================================
// Root & Health
// =============================================================================

/// Root status response.
#[derive(Serialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub msg: &'static str,
}

/// Service root. Must answer without touching the provider so liveness
/// probes survive credential misconfiguration.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        ok: true,
        msg: "tradingview-whatsapp relay; POST alerts to /webhook",
    })
}

/// Liveness probe response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Liveness probe for the hosting platform.
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

// =============================================================================
// Alert Webhook
// =============================================================================

/// Webhook response.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl WebhookResponse {
    fn status_only(status: &'static str) -> Self {
        Self {
            status,
            sid: None,
            detail: None,
        }
    }
}

/// Alert ingestion endpoint.
///
/// This endpoint:
/// 1. Verifies the X-Webhook-Token header
/// 2. Normalizes the body into a single alert text
/// 3. Truncates and forwards it to the configured destinations
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let provided = headers.get("X-Webhook-Token").and_then(|v| v.to_str().ok());

    if !verify_webhook_token(state.config.webhook_token.as_deref(), provided) {
        warn!(token_present = provided.is_some(), "webhook_unauthorized");
        return (
            StatusCode::UNAUTHORIZED,
            Json(WebhookResponse::status_only("unauthorized")),
        );
    }

    let text = extract_alert_text(&body);
    let text = text.trim();
    if text.is_empty() {
        warn!("webhook_empty_message");
        return (
            StatusCode::BAD_REQUEST,
            Json(WebhookResponse::status_only("empty_message")),
        );
    }

    let text = clip(text);
    info!(
        text_chars = text.chars().count(),
        destinations = state.config.to_whatsapp.len(),
        "webhook_received"
    );

    match send_to_all(state.notifier.as_ref(), &state.config.to_whatsapp, text).await {
        Ok(sent) => {
            info!(sid = %sent.sid, status = %sent.status, "webhook_sent");
            (
                StatusCode::OK,
                Json(WebhookResponse {
                    status: "sent",
                    sid: Some(sent.sid),
                    detail: None,
                }),
            )
        }
        Err(e) => {
            error!(error = %e, "webhook_send_failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookResponse {
                    status: "error",
                    sid: None,
                    detail: Some(e.to_string()),
                }),
            )
        }
    }
}

/// Normalize a request body into the alert text.
///
/// A JSON object with a string `message` field wins; anything else
/// (invalid JSON, non-object, missing or non-string field) degrades to
/// the raw body decoded as UTF-8. A sender whose Content-Type disagrees
/// with the payload shape is therefore never rejected.
fn extract_alert_text(body: &[u8]) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(body) {
        if let Some(serde_json::Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }
    String::from_utf8_lossy(body).into_owned()
}

// =============================================================================
// Manual test sender
// =============================================================================

#[derive(Deserialize)]
pub struct TestParams {
    #[serde(default = "default_test_message")]
    pub q: String,
}

fn default_test_message() -> String {
    "Hello from /send/test!".to_string()
}

/// Manual test-send response.
#[derive(Serialize)]
pub struct TestSendResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Manual sender for smoke-testing provider credentials.
pub async fn send_test(
    State(state): State<AppState>,
    Query(params): Query<TestParams>,
) -> impl IntoResponse {
    let text = clip(&params.q);

    match send_to_all(state.notifier.as_ref(), &state.config.to_whatsapp, text).await {
        Ok(sent) => (
            StatusCode::OK,
            Json(TestSendResponse {
                ok: true,
                sid: Some(sent.sid),
                status: Some(sent.status),
                error: None,
            }),
        ),
        Err(e) => {
            error!(error = %e, "send_test_failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TestSendResponse {
                    ok: false,
                    sid: None,
                    status: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
