//! In-process knowledge store.
//!
//! Holds a fixed entry list (usually the seed file) and keeps appended log
//! rows in a bounded in-memory buffer. Used when the remote store is not
//! configured, and as the test double for the chat pipeline.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::knowledge::{ChatLogRow, KnowledgeEntry, normalize_key};

/// Oldest rows are dropped past this many.
const LOG_CAPACITY: usize = 1000;

/// A log row as recorded by the local store.
#[derive(Debug, Clone)]
pub struct LoggedRow {
    pub row: ChatLogRow,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    entries: Arc<Vec<KnowledgeEntry>>,
    /// normalized title -> index into `entries`; first title wins.
    index: Arc<HashMap<String, usize>>,
    logs: Arc<Mutex<VecDeque<LoggedRow>>>,
}

impl LocalStore {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.key()).or_insert(i);
        }
        Self {
            entries: Arc::new(entries),
            index: Arc::new(index),
            logs: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_entry(&self, key: &str) -> Option<KnowledgeEntry> {
        self.index
            .get(&normalize_key(key))
            .and_then(|&i| self.entries.get(i))
            .cloned()
    }

    pub fn categories(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.category.clone())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn entries_by_category(&self, category: &str) -> Vec<KnowledgeEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    pub fn all_entries(&self) -> Vec<KnowledgeEntry> {
        self.entries.as_ref().clone()
    }

    pub fn append_log(&self, row: &ChatLogRow) {
        debug!(category = %row.category, source = %row.source, "local store: log row appended");
        let mut logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        if logs.len() == LOG_CAPACITY {
            logs.pop_front();
        }
        logs.push_back(LoggedRow {
            row: row.clone(),
            logged_at: Utc::now(),
        });
    }

    /// Snapshot of the buffered log rows, oldest first.
    pub fn recent_logs(&self) -> Vec<LoggedRow> {
        let logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        logs.iter().cloned().collect()
    }
}
