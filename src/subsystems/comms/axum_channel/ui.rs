//! UI route handler for the axum channel.
//!
//! Every path no API route claims goes to the [`UiServe`] backend, called via
//! [`tokio::task::spawn_blocking`] because it may read files from disk.
//!
//! [`UiServe`]: crate::subsystems::ui::UiServe

use axum::{
    body::Body,
    extract::State,
    http::{Response, StatusCode, Uri, header},
    response::IntoResponse,
};
use tracing::warn;

use super::AxumState;

/// GET / and GET /*path: delegate to the UI backend, or 404.
pub(super) async fn serve_path(State(state): State<AxumState>, uri: Uri) -> axum::response::Response {
    let Some(ui) = state.ui else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let path = uri.path().to_string();
    match tokio::task::spawn_blocking(move || ui.serve(&path)).await {
        Ok(Some(resp)) => Response::builder()
            .status(status_code(resp.status))
            .header(header::CONTENT_TYPE, resp.content_type)
            .body(Body::from(resp.body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!(channel_id = %state.channel_id, "ui backend task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Out-of-range codes become 500 rather than panicking.
fn status_code(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
