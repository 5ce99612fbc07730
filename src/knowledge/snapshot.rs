//! Startup copy of the knowledge table.
//!
//! Built once before the server starts and never refreshed; entries edited
//! in the remote table after startup are not reflected here. The chat
//! service only consults it when the snapshot fallback is switched on and a
//! live lookup fails with a store error.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::knowledge::{KnowledgeEntry, KnowledgeStore, normalize_key};

/// Where the snapshot contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Store,
    Seed,
}

/// Immutable mapping from normalized title to entry.
#[derive(Debug, Clone)]
pub struct KnowledgeSnapshot {
    entries: HashMap<String, KnowledgeEntry>,
    source: SnapshotSource,
}

impl KnowledgeSnapshot {
    /// Build from an entry list; the first entry for a given key wins.
    pub fn from_entries(entries: Vec<KnowledgeEntry>, source: SnapshotSource) -> Self {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            map.entry(entry.key()).or_insert(entry);
        }
        Self { entries: map, source }
    }

    /// Load every entry from `store`. If the store is unreachable, warn and
    /// fall back to `seed` (which may be empty).
    pub async fn load(store: &KnowledgeStore, seed: Vec<KnowledgeEntry>) -> Self {
        match store.all_entries().await {
            Ok(entries) => {
                let snapshot = Self::from_entries(entries, SnapshotSource::Store);
                info!(
                    store = store.backend_name(),
                    entries = snapshot.len(),
                    "knowledge snapshot loaded"
                );
                snapshot
            }
            Err(e) => {
                warn!(
                    store = store.backend_name(),
                    seed_entries = seed.len(),
                    "knowledge snapshot: store unavailable ({e}), using seed entries"
                );
                Self::from_entries(seed, SnapshotSource::Seed)
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&KnowledgeEntry> {
        self.entries.get(&normalize_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }
}
