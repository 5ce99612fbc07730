//! UI subsystem: serves the frontend for every non-API path.
//!
//! The subsystem runs no tasks of its own. [`start`] builds a
//! [`UiServeHandle`] that the HTTP channel calls synchronously for paths no
//! API route claims. The mode (development shim vs. production bundle) is
//! fixed at startup from config.

#[cfg(feature = "ui-spa")]
pub mod spa;

use std::sync::Arc;

use tracing::info;

use crate::core::config::Config;

// ── UiServe trait ─────────────────────────────────────────────────────────────

/// Response returned by [`UiServe::serve`].
#[derive(Debug)]
pub struct ServeResponse {
    pub status: u16,
    /// MIME content type, e.g. `"text/html; charset=utf-8"`.
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ServeResponse {
    pub fn html(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, content_type: "text/html; charset=utf-8", body: body.into() }
    }

    pub fn text(status: u16, body: &'static str) -> Self {
        Self { status, content_type: "text/plain; charset=utf-8", body: body.as_bytes().to_vec() }
    }
}

/// A UI backend that can serve HTTP requests for static assets / pages.
///
/// [`UiServe::serve`] may do blocking file I/O; async callers run it on the
/// blocking pool.
pub trait UiServe: Send + Sync {
    /// Serve a request for `path` (e.g. `"/"`, `"/assets/app.js"`).
    ///
    /// Returns `Some(response)` if this backend handles the path, or `None`
    /// to let the caller fall through to its own 404.
    fn serve(&self, path: &str) -> Option<ServeResponse>;
}

/// Shared handle passed to the HTTP channel.
pub type UiServeHandle = Arc<dyn UiServe>;

// ── start ─────────────────────────────────────────────────────────────────────

/// Build the configured UI backend and return its serve handle.
///
/// Returns `None` if no UI backend is enabled.
pub fn start(config: &Config) -> Option<UiServeHandle> {
    #[cfg(feature = "ui-spa")]
    {
        if config.ui_should_load() {
            let backend = spa::SpaBackend::new(&config.ui);
            info!(mode = %config.ui.mode, "ui: spa backend loaded");
            return Some(Arc::new(backend));
        }
    }

    let _ = config;
    info!("ui: no backend enabled");
    None
}
