//! Supabase knowledge store over the PostgREST API (`/rest/v1/<table>`).
//!
//! All PostgREST wire types are private to this module; callers only see
//! [`KnowledgeEntry`] and [`StoreError`]. The store is stateless; one
//! request per operation, no retries.

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, error, trace};

use crate::knowledge::{ChatLogRow, KnowledgeEntry, StoreError, normalize_key};

const ENTRY_COLUMNS: &str = "title,description,category";

/// Upper bound on candidate rows fetched for one lookup. Candidates are
/// filtered client-side down to exact key matches.
const LOOKUP_CANDIDATES: &str = "5";

// ── Public store ──────────────────────────────────────────────────────────────

/// Adapter for a Supabase project's REST endpoint.
///
/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    /// Project URL without trailing slash.
    url: String,
    knowledge_table: String,
    log_table: String,
    api_key: String,
}

impl SupabaseStore {
    /// Build a store from config values.
    ///
    /// The key is sent both as `apikey` and as `Authorization: Bearer <key>`,
    /// which is what the Supabase gateway expects for anon/service keys.
    pub fn new(
        url: String,
        knowledge_table: String,
        log_table: String,
        timeout_seconds: u64,
        api_key: String,
    ) -> Result<Self, StoreError> {
        if url.is_empty() {
            return Err(StoreError::NotConfigured("SUPABASE_URL is empty".into()));
        }
        if api_key.is_empty() {
            return Err(StoreError::NotConfigured("SUPABASE_KEY is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| StoreError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            knowledge_table,
            log_table,
            api_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }

    async fn fetch_entries(&self, filters: &[(&str, String)]) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let mut query: Vec<(&str, String)> = vec![("select", ENTRY_COLUMNS.to_string())];
        query.extend(filters.iter().cloned());

        let url = self.table_url(&self.knowledge_table);
        debug!(table = %self.knowledge_table, filters = filters.len(), "store select");

        let req = self.authed(self.client.get(&url).query(&query));
        let response = req.send().await.map_err(|e| {
            error!(url = %url, error = %e, "store request failed (transport)");
            StoreError::Request(e.to_string())
        })?;
        let response = check_status(response).await?;

        let rows = response.json::<Vec<EntryRow>>().await.map_err(|e| {
            error!(error = %e, "failed to decode store rows");
            StoreError::Decode(e.to_string())
        })?;
        trace!(rows = rows.len(), "store rows received");

        Ok(rows.into_iter().map(EntryRow::into_entry).collect())
    }

    /// Fetch the entry whose normalized title equals `key`.
    ///
    /// The server-side `ilike` filter compares against the stored title as
    /// is, so a title with surrounding whitespace is never a candidate even
    /// though its key matches. Only the first [`LOOKUP_CANDIDATES`] rows are
    /// checked; a key containing `*` sends a single-character wildcard, and
    /// near matches can fill the candidate set before the exact row.
    pub async fn get_entry(&self, key: &str) -> Result<Option<KnowledgeEntry>, StoreError> {
        let key = normalize_key(key);
        let candidates = self
            .fetch_entries(&[
                ("title", format!("ilike.{}", like_pattern(&key))),
                ("limit", LOOKUP_CANDIDATES.to_string()),
            ])
            .await?;

        Ok(candidates.into_iter().find(|e| e.key() == key))
    }

    pub async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let url = self.table_url(&self.knowledge_table);
        let req = self.authed(self.client.get(&url).query(&[("select", "category")]));
        let response = req
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let response = check_status(response).await?;
        let rows = response
            .json::<Vec<CategoryRow>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|r| r.category)
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    pub async fn entries_by_category(&self, category: &str) -> Result<Vec<KnowledgeEntry>, StoreError> {
        self.fetch_entries(&[("category", format!("eq.{category}"))]).await
    }

    pub async fn all_entries(&self) -> Result<Vec<KnowledgeEntry>, StoreError> {
        self.fetch_entries(&[]).await
    }

    pub async fn append_log(&self, row: &ChatLogRow) -> Result<(), StoreError> {
        let url = self.table_url(&self.log_table);
        let req = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(row);
        let response = req
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }

    /// Reachability and credentials probe: a one-row select on the
    /// knowledge table. Any non-2xx answer counts as a failure.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let url = self.table_url(&self.knowledge_table);
        let req = self.authed(self.client.get(&url).query(&[("select", "title"), ("limit", "1")]));
        let response = req
            .send()
            .await
            .map_err(|e| StoreError::Request(format!("unreachable: {e}")))?;
        check_status(response).await.map(|_| ())
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EntryRow {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl EntryRow {
    fn into_entry(self) -> KnowledgeEntry {
        KnowledgeEntry {
            title: self.title,
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    #[serde(default)]
    category: Option<String>,
}

// PostgREST error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Build an `ilike` operand that matches `key` literally.
///
/// LIKE metacharacters are escaped; PostgREST turns `*` into `%`, so a
/// literal `*` becomes the single-character wildcard and the exact match is
/// enforced by the client-side key comparison.
fn like_pattern(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '*' => out.push('_'),
            _ => out.push(c),
        }
    }
    out
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(err) => match err.code {
            Some(code) => format!("{} [code={code}]", err.message),
            None => err.message,
        },
        Err(_) => body,
    };

    error!(%status, %message, "store returned HTTP error");
    Err(StoreError::Status { status: status.as_u16(), message })
}
