//! Knowledge store implementations.
//!
//! `build(config, api_key, seed)` is the factory, called at startup.
//! Adding a new backend = new module + new match arm.

pub mod local;
#[cfg(feature = "store-supabase")]
pub mod supabase;

use crate::core::config::StoreConfig;
use crate::knowledge::{KnowledgeEntry, KnowledgeStore, StoreError};

/// Construct a `KnowledgeStore` from config.
///
/// `api_key` is sourced from `SUPABASE_KEY` env (never TOML). `seed` is the
/// entry list the local backend serves. A `supabase` backend with a missing
/// URL or key returns [`StoreError::NotConfigured`]; the caller decides
/// whether to fall back to the local store.
pub fn build(
    config: &StoreConfig,
    api_key: Option<String>,
    seed: Vec<KnowledgeEntry>,
) -> Result<KnowledgeStore, StoreError> {
    match config.backend.as_str() {
        "local" | "static" => Ok(KnowledgeStore::Local(local::LocalStore::new(seed))),
        #[cfg(feature = "store-supabase")]
        "supabase" => {
            let sb = &config.supabase;
            let store = supabase::SupabaseStore::new(
                sb.url.clone(),
                sb.knowledge_table.clone(),
                sb.log_table.clone(),
                sb.timeout_seconds,
                api_key.unwrap_or_default(),
            )?;
            Ok(KnowledgeStore::Supabase(store))
        }
        #[cfg(not(feature = "store-supabase"))]
        "supabase" => {
            let _ = api_key;
            Err(StoreError::NotConfigured(
                "compiled without the `store-supabase` feature".into(),
            ))
        }
        other => Err(StoreError::UnknownBackend(other.to_string())),
    }
}
