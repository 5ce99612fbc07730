//! Axum HTTP channel: chat, admin and store APIs, with every other path
//! delegated to the UI backend.
//!
//! ```text
//! POST /chat                          → {"reply": …}, always 200
//! GET  /admin                         → dashboard HTML
//! GET  /api/stats                     → fixed dashboard stats
//! GET  /api/logs                      → fixed dashboard log rows
//! GET  /api/health
//! GET  /api/categories
//! GET  /api/categories/{category}
//! GET  /favicon.ico                   → 204
//! GET  /  and  /*path                 → UI backend (dev shim / static / SPA fallback)
//! ```
//!
//! Implements [`Component`]; the comms [`CancellationToken`] drives axum's
//! graceful shutdown.

mod api;
mod ui;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::core::error::AppError;
use crate::subsystems::chat::ChatService;
use crate::subsystems::runtime::{Component, ComponentFuture};
use crate::subsystems::ui::UiServeHandle;

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler. Cheap to clone.
#[derive(Clone)]
pub struct AxumState {
    /// Channel identifier used in log fields.
    pub channel_id: Arc<str>,
    pub chat: ChatService,
    /// UI backend for non-API paths; `None` means those paths 404.
    pub ui: Option<UiServeHandle>,
}

// ── AxumChannel ───────────────────────────────────────────────────────────────

pub struct AxumChannel {
    channel_id: String,
    bind_addr: String,
    cors_origins: Vec<String>,
    chat: ChatService,
    ui_handle: Option<UiServeHandle>,
}

impl AxumChannel {
    pub fn new(
        channel_id: impl Into<String>,
        bind_addr: impl Into<String>,
        cors_origins: Vec<String>,
        chat: ChatService,
        ui_handle: Option<UiServeHandle>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            bind_addr: bind_addr.into(),
            cors_origins,
            chat,
            ui_handle,
        }
    }
}

impl Component for AxumChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_axum(*self, shutdown))
    }
}

// ── Server loop ───────────────────────────────────────────────────────────────

async fn run_axum(channel: AxumChannel, shutdown: CancellationToken) -> Result<(), AppError> {
    let AxumChannel { channel_id, bind_addr, cors_origins, chat, ui_handle } = channel;

    let state = AxumState {
        channel_id: Arc::from(channel_id.as_str()),
        chat,
        ui: ui_handle,
    };
    let router = build_router(state, &cors_origins);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Comms(format!("axum bind failed on {bind_addr}: {e}")))?;

    info!(%channel_id, %bind_addr, "axum channel listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Comms(format!("axum server error: {e}")))?;

    info!(%channel_id, "axum channel shut down");
    Ok(())
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AxumState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/chat",                       post(api::chat))
        .route("/admin",                      get(api::admin))
        .route("/api/stats",                  get(api::stats))
        .route("/api/logs",                   get(api::logs))
        .route("/api/health",                 get(api::health))
        .route("/api/categories",             get(api::categories))
        .route("/api/categories/{category}",  get(api::category_entries))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .route("/",            get(ui::serve_path))
        .route("/{*path}",     get(ui::serve_path))
        .layer(build_cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured browser origins. Unparseable origins are skipped.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let mut allowed = Vec::with_capacity(origins.len());
    for origin in origins {
        match HeaderValue::from_str(origin) {
            Ok(value) => allowed.push(value),
            Err(e) => warn!(%origin, "ignoring invalid CORS origin: {e}"),
        }
    }

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::knowledge::stores::local::LocalStore;
    use crate::knowledge::{KnowledgeEntry, KnowledgeStore};
    use crate::subsystems::chat::DEFAULT_REPLY;

    const SERVICES_REPLY: &str = "We offer software development, cloud and cybersecurity services.";

    fn seeded_store() -> LocalStore {
        LocalStore::new(vec![
            KnowledgeEntry {
                title: "What services do you offer".into(),
                description: SERVICES_REPLY.into(),
                category: "Services".into(),
            },
            KnowledgeEntry {
                title: "RPA Services".into(),
                description: "We automate back-office processes.".into(),
                category: "Capabilities".into(),
            },
        ])
    }

    fn router_with(store: KnowledgeStore, ui: Option<UiServeHandle>) -> Router {
        let state = AxumState {
            channel_id: Arc::from("test"),
            chat: ChatService::new(store, None),
            ui,
        };
        build_router(state, &["http://localhost:8080".to_string()])
    }

    fn router() -> Router {
        router_with(KnowledgeStore::Local(seeded_store()), None)
    }

    async fn post_chat(router: Router, body: &'static str) -> (StatusCode, Value) {
        let resp = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn fetch(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn chat_returns_matching_description() {
        let (status, json) = post_chat(router(), r#"{"message":"what services do you offer"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reply"], SERVICES_REPLY);
    }

    #[tokio::test]
    async fn chat_alias_matches_canonical() {
        let (_, alias) = post_chat(router(), r#"{"message":"RPA service"}"#).await;
        let (_, canonical) = post_chat(router(), r#"{"message":"rpa services"}"#).await;
        assert_eq!(alias, canonical);
        assert_eq!(alias["reply"], "We automate back-office processes.");
    }

    #[tokio::test]
    async fn chat_unknown_message_gets_default_and_logs_no_match() {
        let store = seeded_store();
        let (status, json) = post_chat(
            router_with(KnowledgeStore::Local(store.clone()), None),
            r#"{"message":"what is the weather"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reply"], DEFAULT_REPLY);
        let logs = store.recent_logs();
        assert_eq!(logs.last().unwrap().row.category, "no_match");
    }

    #[tokio::test]
    async fn chat_missing_or_bad_message_is_still_200() {
        for body in [r#"{}"#, r#"{"message":""}"#, r#"{"message":42}"#, "not json", ""] {
            let (status, json) = post_chat(router(), body).await;
            assert_eq!(status, StatusCode::OK, "body {body:?}");
            assert_eq!(json["reply"], DEFAULT_REPLY, "body {body:?}");
        }
    }

    #[cfg(feature = "store-supabase")]
    #[tokio::test]
    async fn chat_store_failure_is_200_default() {
        use crate::knowledge::stores::supabase::SupabaseStore;

        let store = SupabaseStore::new(
            "http://127.0.0.1:9".into(),
            "chatbot_knowledge".into(),
            "chat_logs".into(),
            1,
            "key".into(),
        )
        .unwrap();
        let router = router_with(KnowledgeStore::Supabase(store.clone()), None);
        let (status, json) = post_chat(router, r#"{"message":"what services do you offer"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reply"], DEFAULT_REPLY);

        let (status, body) = fetch(router_with(KnowledgeStore::Supabase(store), None), "/api/categories").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "store");
    }

    #[tokio::test]
    async fn stats_are_constant_regardless_of_query() {
        let (status, a) = fetch(router(), "/api/stats").await;
        let (_, b) = fetch(router(), "/api/stats?range=7d&x=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(a, b);
        let json: Value = serde_json::from_slice(&a).unwrap();
        assert_eq!(json["totalChats"], 124);
    }

    #[tokio::test]
    async fn logs_are_five_rows() {
        let (status, body) = fetch(router(), "/api/logs").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn admin_serves_dashboard() {
        let (status, body) = fetch(router(), "/admin").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("/api/stats"));
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let (status, body) = fetch(router(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store"], "local");
        assert_eq!(json["snapshot_entries"], 0);
    }

    #[tokio::test]
    async fn health_counts_snapshot_entries() {
        use crate::knowledge::snapshot::{KnowledgeSnapshot, SnapshotSource};

        let store = seeded_store();
        let snapshot = KnowledgeSnapshot::from_entries(store.all_entries(), SnapshotSource::Seed);
        let state = AxumState {
            channel_id: Arc::from("test"),
            chat: ChatService::new(KnowledgeStore::Local(store), Some(Arc::new(snapshot))),
            ui: None,
        };
        let (status, body) = fetch(build_router(state, &[]), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["snapshot_entries"], 2);
    }

    #[tokio::test]
    async fn categories_list_and_filter() {
        let (status, body) = fetch(router(), "/api/categories").await;
        assert_eq!(status, StatusCode::OK);
        let cats: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(cats, vec!["Capabilities", "Services"]);

        let (status, body) = fetch(router(), "/api/categories/Services").await;
        assert_eq!(status, StatusCode::OK);
        let entries: Vec<KnowledgeEntry> = serde_json::from_slice(&body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, SERVICES_REPLY);
    }

    #[tokio::test]
    async fn favicon_is_no_content() {
        let (status, _) = fetch(router(), "/favicon.ico").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn unknown_path_without_ui_is_404() {
        let (status, _) = fetch(router(), "/some/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let resp = router()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/chat")
                    .header("origin", "http://localhost:8080")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:8080"
        );
    }

    #[cfg(feature = "ui-spa")]
    #[tokio::test]
    async fn spa_fallback_serves_index() {
        use crate::core::config::Config;
        use crate::subsystems::ui;

        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>spa</html>").unwrap();
        let handle = ui::start(&Config::test_default(dir.path()));
        assert!(handle.is_some());

        for uri in ["/", "/dashboard/settings"] {
            let (status, body) = fetch(router_with(KnowledgeStore::Local(seeded_store()), handle.clone()), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, b"<html>spa</html>", "{uri}");
        }

        let (status, _) = fetch(router_with(KnowledgeStore::Local(seeded_store()), handle), "/a/../b").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
