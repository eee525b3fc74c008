use std::{io::Error, path::PathBuf};

use chrono::Utc;

use crate::{
    types::{SelectionKey, SelectionRecord},
    utils, warning,
};

/// Upper bound on retained selections; oldest entries are evicted first.
pub const MAX_SELECTIONS: usize = 10;

#[derive(Debug)]
pub enum LedgerError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for LedgerError {
    fn from(err: Error) -> Self {
        LedgerError::IoError(err)
    }
}

/// Ordered, size-capped list of the user's current track/artist picks,
/// kept newest-first and persisted as JSON.
///
/// The file on disk is the authoritative copy; the optional document-store
/// mirror is written best-effort elsewhere and never read back here.
pub struct SelectionLedger {
    selections: Vec<SelectionRecord>,
    path: PathBuf,
}

impl SelectionLedger {
    pub fn new(path: PathBuf, selections: Option<Vec<SelectionRecord>>) -> Self {
        let mut ledger = Self {
            selections: selections.unwrap_or(Vec::new()),
            path,
        };
        ledger.sort_and_cap();
        ledger
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("selectify/state/selections.json");
        path
    }

    /// Loads the ledger from disk. A missing or unreadable file yields an
    /// empty ledger; startup never fails on ledger state.
    pub async fn load(path: PathBuf) -> Self {
        let selections = match async_fs::read_to_string(&path).await {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(selections) => Some(selections),
                Err(e) => {
                    warning!("Discarding unparsable selection state: {}", e);
                    None
                }
            },
            Err(_) => None,
        };
        Self::new(path, selections)
    }

    pub async fn persist(&self) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| LedgerError::IoError(e))?;
        }

        let json = serde_json::to_string_pretty(&self.selections)
            .map_err(|e| LedgerError::SerdeError(e))?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| LedgerError::IoError(e))
    }

    /// Adds a batch of picks produced by one search.
    ///
    /// Each record is normalized (missing artist name becomes
    /// "Unknown Artist", the grouping query and a fresh `selected_at` are
    /// stamped), prepended, and the ledger is re-capped to the
    /// [`MAX_SELECTIONS`] most recent entries. Returns the normalized batch
    /// as it was inserted, for mirroring. An empty batch is a no-op.
    pub fn add(
        &mut self,
        records: Vec<SelectionRecord>,
        search_query: &str,
    ) -> Vec<SelectionRecord> {
        if records.is_empty() {
            return Vec::new();
        }

        let now_ms = Utc::now().timestamp_millis();
        let normalized: Vec<SelectionRecord> = records
            .into_iter()
            .map(|mut record| {
                if record.artist_names.trim().is_empty() {
                    record.artist_names = "Unknown Artist".to_string();
                }
                record.search_query = search_query.to_string();
                record.selected_at = now_ms;
                record
            })
            .collect();

        self.selections.splice(0..0, normalized.iter().cloned());
        self.sort_and_cap();
        normalized
    }

    /// Removes selections by key, cascading over search groups.
    ///
    /// For each key the first matching entry is located (by bare id or by
    /// the id inside a spotify URI). When that entry carries a grouping
    /// query, every entry from the same search is removed with it; entries
    /// without grouping information are removed individually. Returns the
    /// number of entries removed.
    pub fn remove(&mut self, keys: &[SelectionKey]) -> usize {
        let before = self.selections.len();

        for key in keys {
            let id = key
                .id
                .as_deref()
                .or_else(|| key.uri.as_deref().and_then(utils::id_from_uri));
            let Some(id) = id else {
                continue;
            };
            let Some(matched) = self.selections.iter().find(|s| s.spotify_id == id) else {
                continue;
            };

            let query = matched.search_query.clone();
            if query.is_empty() {
                self.selections.retain(|s| s.spotify_id != id);
            } else {
                self.selections.retain(|s| s.search_query != query);
            }
        }

        before - self.selections.len()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    /// The `n` most recent selections, newest first.
    pub fn latest(&self, n: usize) -> &[SelectionRecord] {
        &self.selections[..self.selections.len().min(n)]
    }

    pub fn selections(&self) -> &[SelectionRecord] {
        &self.selections
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    fn sort_and_cap(&mut self) {
        self.selections
            .sort_by(|a, b| b.selected_at.cmp(&a.selected_at));
        self.selections.truncate(MAX_SELECTIONS);
    }
}
