//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs that subsystems consume.
//! Raw TOML deserialization types live in `raw.rs`.

use std::fmt;
use std::path::PathBuf;

// ── Server ──────────────────────────────────────────────────────────────────

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the axum listener to.
    pub bind: String,
    /// Origins allowed to call the API cross-origin.
    pub cors_origins: Vec<String>,
}

// ── Store ───────────────────────────────────────────────────────────────────

/// Supabase (PostgREST) backend configuration.
/// Populated from `[store.supabase]` in the TOML, with `SUPABASE_URL` override.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`. Empty when unset.
    pub url: String,
    /// Table holding knowledge entries.
    pub knowledge_table: String,
    /// Table receiving chat log rows.
    pub log_table: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// Knowledge store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Which backend is active (`"supabase"` or `"local"`).
    /// Maps to `default` in `[store]`.
    pub backend: String,
    pub supabase: SupabaseConfig,
}

// ── Knowledge ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct KnowledgeConfig {
    /// Optional TOML file with `[[entry]]` tables seeding the local store and
    /// the startup snapshot when the remote store is unreachable.
    pub seed_file: Option<PathBuf>,
    /// Consult the startup snapshot when a live lookup fails with a store error.
    pub snapshot_fallback: bool,
}

// ── UI ──────────────────────────────────────────────────────────────────────

/// How non-API paths are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Redirect shim pointing at the frontend dev server.
    Development,
    /// Serve the prebuilt bundle from `static_dir` with SPA fallback.
    Production,
}

impl UiMode {
    /// Parse a mode string. Accepts the short forms `dev` and `prod`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(UiMode::Development),
            "production" | "prod" => Some(UiMode::Production),
            _ => None,
        }
    }
}

impl fmt::Display for UiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiMode::Development => f.write_str("development"),
            UiMode::Production => f.write_str("production"),
        }
    }
}

/// UI subsystem configuration.
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Whether the UI backend is loaded at all.
    pub enabled: bool,
    pub mode: UiMode,
    /// Prebuilt frontend directory (already expanded, no `~`).
    pub static_dir: PathBuf,
    /// Base URL of the frontend dev server, without trailing slash.
    pub dev_server_url: String,
}

// ── Top-level ───────────────────────────────────────────────────────────────

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    pub log_level: String,
    /// Append tracing output to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    pub server: ServerConfig,
    pub store: StoreConfig,
    /// API key from `SUPABASE_KEY` env var. Never sourced from TOML.
    pub store_api_key: Option<String>,
    /// `YVI_ENV` value that was not a known mode; production was used instead.
    pub ignored_env_mode: Option<String>,
    pub knowledge: KnowledgeConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Returns `true` if the UI backend should be loaded.
    pub fn ui_should_load(&self) -> bool {
        self.ui.enabled
    }
}
