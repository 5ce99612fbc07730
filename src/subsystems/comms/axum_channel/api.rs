//! Axum handlers for the chat, admin and `/api/*` routes.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::AxumState;
use crate::subsystems::admin;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

/// `message` field of a chat request body. Anything that is not a JSON
/// object with a string `message` reads as empty.
fn message_field(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_default()
}

// ── Chat ──────────────────────────────────────────────────────────────────────

/// POST /chat: always 200 with `{"reply": …}`.
///
/// The body is parsed leniently rather than through the `Json` extractor so
/// a missing content type or malformed body still gets the default reply.
pub(super) async fn chat(State(state): State<AxumState>, body: Bytes) -> Json<Value> {
    let message = message_field(&body);
    debug!(channel_id = %state.channel_id, len = message.len(), "chat request");
    let reply = state.chat.respond(&message).await;
    Json(json!({ "reply": reply.reply }))
}

// ── Admin ─────────────────────────────────────────────────────────────────────

/// GET /admin
pub(super) async fn admin() -> Html<&'static str> {
    Html(admin::DASHBOARD_HTML)
}

/// GET /api/stats
pub(super) async fn stats() -> Json<admin::DashboardStats> {
    Json(admin::stats())
}

/// GET /api/logs
pub(super) async fn logs() -> Json<&'static [admin::LogRecord]> {
    Json(admin::logs())
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// GET /api/health: `snapshot_entries` is 0 when the fallback is off.
pub(super) async fn health(State(state): State<AxumState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "store": state.chat.store().backend_name(),
        "snapshot_entries": state.chat.snapshot_len().unwrap_or(0),
    }))
}

/// GET /api/categories
pub(super) async fn categories(State(state): State<AxumState>) -> Response {
    match state.chat.store().categories().await {
        Ok(categories) => Json(categories).into_response(),
        Err(e) => {
            warn!(channel_id = %state.channel_id, "category listing failed: {e}");
            (StatusCode::BAD_GATEWAY, json_error("store", e)).into_response()
        }
    }
}

/// GET /api/categories/{category}
pub(super) async fn category_entries(
    State(state): State<AxumState>,
    Path(category): Path<String>,
) -> Response {
    match state.chat.store().entries_by_category(&category).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            warn!(channel_id = %state.channel_id, %category, "category lookup failed: {e}");
            (StatusCode::BAD_GATEWAY, json_error("store", e)).into_response()
        }
    }
}
