//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape, the serde target before resolution.
#[derive(Deserialize)]
pub(super) struct RawConfig {
    pub supervisor: RawSupervisor,
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub store: RawStore,
    #[serde(default)]
    pub knowledge: RawKnowledge,
    #[serde(default)]
    pub ui: RawUi,
}

#[derive(Deserialize)]
pub(super) struct RawSupervisor {
    pub bot_name: String,
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

// ── Server ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawServer {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: default_cors_origins(),
        }
    }
}

// ── Store ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawStore {
    /// Maps to `default = "..."` in `[store]`.
    #[serde(rename = "default", default = "default_store_backend")]
    pub backend: String,
    #[serde(default)]
    pub supabase: RawSupabase,
}

impl Default for RawStore {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            supabase: RawSupabase::default(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawSupabase {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_knowledge_table")]
    pub knowledge_table: String,
    #[serde(default = "default_log_table")]
    pub log_table: String,
    #[serde(default = "default_store_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RawSupabase {
    fn default() -> Self {
        Self {
            url: String::new(),
            knowledge_table: default_knowledge_table(),
            log_table: default_log_table(),
            timeout_seconds: default_store_timeout_seconds(),
        }
    }
}

// ── Knowledge ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub(super) struct RawKnowledge {
    #[serde(default)]
    pub seed_file: Option<String>,
    #[serde(default = "default_false")]
    pub snapshot_fallback: bool,
}

// ── UI ──────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawUi {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ui_mode")]
    pub mode: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_dev_server_url")]
    pub dev_server_url: String,
}

impl Default for RawUi {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: default_ui_mode(),
            static_dir: default_static_dir(),
            dev_server_url: default_dev_server_url(),
        }
    }
}

// ── Defaults ────────────────────────────────────────────────────────────────

pub(super) fn default_bind() -> String { "127.0.0.1:5000".to_string() }
pub(super) fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
    ]
}
pub(super) fn default_store_backend() -> String { "supabase".to_string() }
pub(super) fn default_knowledge_table() -> String { "chatbot_knowledge".to_string() }
pub(super) fn default_log_table() -> String { "chat_logs".to_string() }
pub(super) fn default_store_timeout_seconds() -> u64 { 10 }
pub(super) fn default_ui_mode() -> String { "production".to_string() }
pub(super) fn default_static_dir() -> String { "build".to_string() }
pub(super) fn default_dev_server_url() -> String { "http://localhost:3000".to_string() }

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}
