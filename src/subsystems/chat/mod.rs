//! Chat pipeline: normalize the message, look it up, reply and log.
//!
//! Per request: the message is trimmed and lowercased, a `chat_request` row
//! is logged, synonyms are applied, and the knowledge store is queried by
//! exact key. A hit returns the entry's description verbatim; anything else
//! returns [`DEFAULT_REPLY`]. Store failures never escape this module.
//!
//! Log writes are best effort: a failed write is traced and dropped.

pub mod synonyms;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::knowledge::snapshot::KnowledgeSnapshot;
use crate::knowledge::{ChatLogRow, KnowledgeEntry, KnowledgeStore, Lookup, normalize_key};

/// Reply for any message without a matching entry.
pub const DEFAULT_REPLY: &str = "Sorry, I don't have information about that topic. \
Please ask about Our Services, Core Capabilities, Other Capabilities, Our Process, \
About Us, Contact, or Location.";

/// `source` column of every row this service writes.
pub const LOG_SOURCE: &str = "chat_api";
/// Category of the row logged when a request arrives.
pub const CATEGORY_REQUEST: &str = "chat_request";
/// Category of the row logged when no entry matched.
pub const CATEGORY_NO_MATCH: &str = "no_match";

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Live store lookup.
    Store,
    /// Startup snapshot, after a live lookup failed.
    Snapshot,
    /// No match.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
    /// Category written to the interaction log.
    pub category: String,
    pub source: ReplySource,
}

/// Shared chat capability. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ChatService {
    store: KnowledgeStore,
    /// Present only when the snapshot fallback is enabled.
    snapshot: Option<Arc<KnowledgeSnapshot>>,
}

impl ChatService {
    pub fn new(store: KnowledgeStore, snapshot: Option<Arc<KnowledgeSnapshot>>) -> Self {
        Self { store, snapshot }
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// Entries held by the fallback snapshot; `None` when the fallback is off.
    pub fn snapshot_len(&self) -> Option<usize> {
        self.snapshot.as_ref().map(|s| s.len())
    }

    /// Answer one user message. Never fails.
    pub async fn respond(&self, raw_message: &str) -> ChatReply {
        let message = normalize_key(raw_message);

        self.log(&message, "", CATEGORY_REQUEST).await;

        let key = synonyms::canonicalize(&message);
        if key != message {
            debug!(from = %message, to = %key, "synonym applied");
        }

        // Blank messages never match, even a row with a blank title.
        let lookup = if key.is_empty() {
            Lookup::NotFound
        } else {
            self.store.get_entry(key).await
        };

        match self.resolve(key, lookup) {
            Some((entry, source)) => {
                info!(category = %entry.category, ?source, matched = true, "chat reply");
                self.log(key, &entry.description, &entry.category).await;
                ChatReply {
                    reply: entry.description,
                    category: entry.category,
                    source,
                }
            }
            None => {
                info!(matched = false, "chat reply");
                self.log(key, DEFAULT_REPLY, CATEGORY_NO_MATCH).await;
                ChatReply {
                    reply: DEFAULT_REPLY.to_string(),
                    category: CATEGORY_NO_MATCH.to_string(),
                    source: ReplySource::Default,
                }
            }
        }
    }

    fn resolve(&self, key: &str, lookup: Lookup) -> Option<(KnowledgeEntry, ReplySource)> {
        match lookup {
            Lookup::Found(entry) => Some((entry, ReplySource::Store)),
            Lookup::NotFound => None,
            Lookup::StoreError(reason) => {
                warn!(store = self.store.backend_name(), %reason, "knowledge lookup failed, treating as no match");
                self.snapshot
                    .as_ref()
                    .and_then(|s| s.get(key))
                    .cloned()
                    .map(|entry| (entry, ReplySource::Snapshot))
            }
        }
    }

    async fn log(&self, query: &str, response: &str, category: &str) {
        let row = ChatLogRow {
            query: query.to_string(),
            response: response.to_string(),
            category: category.to_string(),
            source: LOG_SOURCE.to_string(),
        };
        if let Err(e) = self.store.append_log(&row).await {
            warn!(store = self.store.backend_name(), category, "chat log write failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::snapshot::SnapshotSource;
    use crate::knowledge::stores::local::LocalStore;

    fn entry(title: &str, description: &str, category: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            title: title.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    fn local_service() -> (ChatService, LocalStore) {
        let store = LocalStore::new(vec![
            entry(
                "What services do you offer",
                "We offer software development, cloud and cybersecurity services.",
                "Services",
            ),
            entry("RPA Services", "We automate back-office processes.", "Capabilities"),
        ]);
        (ChatService::new(KnowledgeStore::Local(store.clone()), None), store)
    }

    #[tokio::test]
    async fn match_returns_description_and_logs_category() {
        let (svc, store) = local_service();
        let reply = svc.respond("  What Services Do You Offer ").await;
        assert_eq!(reply.reply, "We offer software development, cloud and cybersecurity services.");
        assert_eq!(reply.category, "Services");
        assert_eq!(reply.source, ReplySource::Store);

        let logs = store.recent_logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].row.query, "what services do you offer");
        assert_eq!(logs[0].row.response, "");
        assert_eq!(logs[0].row.category, CATEGORY_REQUEST);
        assert_eq!(logs[1].row.response, reply.reply);
        assert_eq!(logs[1].row.category, "Services");
        assert!(logs.iter().all(|l| l.row.source == LOG_SOURCE));
    }

    #[tokio::test]
    async fn alias_behaves_like_canonical() {
        let (svc, store) = local_service();
        let via_alias = svc.respond("RPA Service").await;
        let via_canonical = svc.respond("rpa services").await;
        assert_eq!(via_alias, via_canonical);
        assert_eq!(via_alias.reply, "We automate back-office processes.");

        // The request row keeps the raw message; the reply row the canonical key.
        let logs = store.recent_logs();
        assert_eq!(logs[0].row.query, "rpa service");
        assert_eq!(logs[1].row.query, "rpa services");
    }

    #[tokio::test]
    async fn no_match_returns_default_and_logs_no_match() {
        let (svc, store) = local_service();
        let reply = svc.respond("tell me a joke").await;
        assert_eq!(reply.reply, DEFAULT_REPLY);
        assert_eq!(reply.source, ReplySource::Default);

        let logs = store.recent_logs();
        assert_eq!(logs.last().unwrap().row.category, CATEGORY_NO_MATCH);
        assert_eq!(logs.last().unwrap().row.response, DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn empty_message_is_no_match() {
        let (svc, _) = local_service();
        assert_eq!(svc.respond("").await.reply, DEFAULT_REPLY);
        assert_eq!(svc.respond("   ").await.reply, DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn blank_message_ignores_blank_title_row() {
        let store = LocalStore::new(vec![entry("  ", "blank row", "Misc")]);
        let svc = ChatService::new(KnowledgeStore::Local(store.clone()), None);
        let reply = svc.respond(" ").await;
        assert_eq!(reply.reply, DEFAULT_REPLY);
        assert_eq!(reply.category, CATEGORY_NO_MATCH);
        assert_eq!(store.recent_logs().len(), 2);
    }

    #[tokio::test]
    async fn reply_is_single_description_verbatim() {
        let store = LocalStore::new(vec![
            entry("Contact", "first", "Contact"),
            entry("contact", "second", "Contact"),
        ]);
        let svc = ChatService::new(KnowledgeStore::Local(store), None);
        assert_eq!(svc.respond("contact").await.reply, "first");
    }

    #[tokio::test]
    async fn snapshot_is_not_consulted_on_plain_miss() {
        let store = KnowledgeStore::Local(LocalStore::new(vec![]));
        let snapshot = KnowledgeSnapshot::from_entries(
            vec![entry("Contact", "from snapshot", "Contact")],
            SnapshotSource::Seed,
        );
        let svc = ChatService::new(store, Some(Arc::new(snapshot)));
        assert_eq!(svc.snapshot_len(), Some(1));
        assert_eq!(svc.respond("contact").await.reply, DEFAULT_REPLY);
    }

    #[cfg(feature = "store-supabase")]
    fn unreachable_store() -> KnowledgeStore {
        use crate::knowledge::stores::supabase::SupabaseStore;
        KnowledgeStore::Supabase(
            SupabaseStore::new(
                "http://127.0.0.1:9".into(),
                "chatbot_knowledge".into(),
                "chat_logs".into(),
                1,
                "key".into(),
            )
            .unwrap(),
        )
    }

    #[cfg(feature = "store-supabase")]
    #[tokio::test]
    async fn store_failure_degrades_to_default() {
        let svc = ChatService::new(unreachable_store(), None);
        let reply = svc.respond("contact").await;
        assert_eq!(reply.reply, DEFAULT_REPLY);
        assert_eq!(reply.category, CATEGORY_NO_MATCH);
    }

    #[cfg(feature = "store-supabase")]
    #[tokio::test]
    async fn store_failure_uses_snapshot_when_enabled() {
        let snapshot = KnowledgeSnapshot::from_entries(
            vec![entry("Contact", "from snapshot", "Contact")],
            SnapshotSource::Seed,
        );
        let svc = ChatService::new(unreachable_store(), Some(Arc::new(snapshot)));
        let reply = svc.respond("Contact").await;
        assert_eq!(reply.reply, "from snapshot");
        assert_eq!(reply.source, ReplySource::Snapshot);

        assert_eq!(svc.respond("unknown").await.reply, DEFAULT_REPLY);
    }
}
