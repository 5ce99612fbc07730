//! Knowledge store abstraction.
//!
//! `KnowledgeStore` is an enum over concrete store backends. Add a new
//! variant + module in `stores/` for each additional backend.
//!
//! Store instances are shared immutable capabilities; clone them freely.
//! Every operation is a direct pass-through to the backend; there is no
//! retry and no caching on this path (see [`snapshot`] for the startup copy).

pub mod seed;
pub mod snapshot;
pub mod stores;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Data model ────────────────────────────────────────────────────────────────

/// One row of the knowledge table. Read-only to this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
}

impl KnowledgeEntry {
    /// Lookup identity of this entry.
    pub fn key(&self) -> String {
        normalize_key(&self.title)
    }
}

/// Lowercased, trimmed form of a title or user message.
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Append-only interaction record.
///
/// The remote table stamps its own insert time; the local store records
/// `logged_at` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLogRow {
    #[serde(rename = "user_query")]
    pub query: String,
    pub response: String,
    pub category: String,
    pub source: String,
}

// ── Error / outcome ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown store backend: {0}")]
    UnknownBackend(String),
    #[error("store not configured: {0}")]
    NotConfigured(String),
    #[error("store request failed: {0}")]
    Request(String),
    #[error("store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("store response could not be decoded: {0}")]
    Decode(String),
}

/// Result of a single-entry lookup.
///
/// Callers decide what a store failure means for them; the chat path treats
/// it like [`Lookup::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(KnowledgeEntry),
    NotFound,
    StoreError(String),
}

impl Lookup {
    pub fn is_store_error(&self) -> bool {
        matches!(self, Lookup::StoreError(_))
    }
}

// ── Store enum ────────────────────────────────────────────────────────────────

/// All available store backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new arm per method.
#[derive(Debug, Clone)]
pub enum KnowledgeStore {
    Local(stores::local::LocalStore),
    #[cfg(feature = "store-supabase")]
    Supabase(stores::supabase::SupabaseStore),
}

impl KnowledgeStore {
    /// Short backend name for logs and the health endpoint.
    pub fn backend_name(&self) -> &'static str {
        match self {
            KnowledgeStore::Local(_) => "local",
            #[cfg(feature = "store-supabase")]
            KnowledgeStore::Supabase(_) => "supabase",
        }
    }

    /// Fetch the entry whose normalized title equals `key`.
    pub async fn get_entry(&self, key: &str) -> Lookup {
        let result: Result<Option<KnowledgeEntry>, StoreError> = match self {
            KnowledgeStore::Local(s) => Ok(s.get_entry(key)),
            #[cfg(feature = "store-supabase")]
            KnowledgeStore::Supabase(s) => s.get_entry(key).await,
        };
        match result {
            Ok(Some(entry)) => Lookup::Found(entry),
            Ok(None) => Lookup::NotFound,
            Err(e) => Lookup::StoreError(e.to_string()),
        }
    }

    /// Distinct categories, sorted.
    pub async fn categories(&self) -> Result<Vec<String>, StoreError> {
        match self {
            KnowledgeStore::Local(s) => Ok(s.categories()),
            #[cfg(feature = "store-supabase")]
            KnowledgeStore::Supabase(s) => s.categories().await,
        }
    }

    pub async fn entries_by_category(&self, category: &str) -> Result<Vec<KnowledgeEntry>, StoreError> {
        match self {
            KnowledgeStore::Local(s) => Ok(s.entries_by_category(category)),
            #[cfg(feature = "store-supabase")]
            KnowledgeStore::Supabase(s) => s.entries_by_category(category).await,
        }
    }

    pub async fn all_entries(&self) -> Result<Vec<KnowledgeEntry>, StoreError> {
        match self {
            KnowledgeStore::Local(s) => Ok(s.all_entries()),
            #[cfg(feature = "store-supabase")]
            KnowledgeStore::Supabase(s) => s.all_entries().await,
        }
    }

    /// Append an interaction row. Callers treat failure as non-fatal.
    pub async fn append_log(&self, row: &ChatLogRow) -> Result<(), StoreError> {
        match self {
            KnowledgeStore::Local(s) => {
                s.append_log(row);
                Ok(())
            }
            #[cfg(feature = "store-supabase")]
            KnowledgeStore::Supabase(s) => s.append_log(row).await,
        }
    }

    /// Reachability probe used at startup.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            KnowledgeStore::Local(_) => Ok(()),
            #[cfg(feature = "store-supabase")]
            KnowledgeStore::Supabase(s) => s.ping().await,
        }
    }
}
