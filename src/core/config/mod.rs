//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `YVI_LOG_LEVEL`, `YVI_ENV`, `SUPABASE_URL` and `SUPABASE_KEY`.
//!
//! # Module layout
//!
//! - **types**: Public configuration structs consumed by subsystems
//!   (`Config`, `StoreConfig`, `UiConfig`, etc.).
//! - **raw**: Raw TOML deserialization types (`RawConfig`, `RawStore`, …).
//!   These mirror the file shape and use serde defaults; kept private.
//! - **load**: Loading logic: `merge_toml`, `load_raw_merged`, `load`,
//!   `load_from`, `expand_home`.

mod load;
mod raw;
mod types;

pub use load::{EnvOverrides, expand_home, load, load_from};
pub use types::*;

impl Config {
    /// Safe `Config` for tests: local store, no API keys, no external calls.
    pub fn test_default(static_dir: &std::path::Path) -> Self {
        Self {
            bot_name: "test".into(),
            log_level: "info".into(),
            log_file: None,
            server: ServerConfig {
                bind: raw::default_bind(),
                cors_origins: raw::default_cors_origins(),
            },
            store: StoreConfig {
                backend: "local".into(),
                supabase: SupabaseConfig {
                    url: "http://127.0.0.1:9".into(),
                    knowledge_table: raw::default_knowledge_table(),
                    log_table: raw::default_log_table(),
                    timeout_seconds: 1,
                },
            },
            store_api_key: None,
            ignored_env_mode: None,
            knowledge: KnowledgeConfig {
                seed_file: None,
                snapshot_fallback: false,
            },
            ui: UiConfig {
                enabled: true,
                mode: UiMode::Production,
                static_dir: static_dir.to_path_buf(),
                dev_server_url: raw::default_dev_server_url(),
            },
        }
    }
}
