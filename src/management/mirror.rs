use std::future::Future;

use reqwest::Client;

use crate::{spotify, types::SelectionRecord, warning};

/// Document-oriented secondary store for selections.
///
/// The store only ever receives whole batches and whole deletes; it is a
/// convenience copy, never consulted when serving requests.
pub trait SelectionMirror: Send + Sync {
    fn add_batch(
        &self,
        records: &[SelectionRecord],
    ) -> impl Future<Output = Result<(), String>> + Send;

    fn clear(&self) -> impl Future<Output = Result<(), String>> + Send;
}

/// REST-backed mirror writing to the document store configured by
/// `SELECTION_MIRROR_URL`.
pub struct HttpMirror {
    base_url: String,
    client: Client,
}

impl HttpMirror {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: spotify::http_client(),
        }
    }
}

impl SelectionMirror for HttpMirror {
    async fn add_batch(&self, records: &[SelectionRecord]) -> Result<(), String> {
        let url = format!("{}/userSelections/batch", self.base_url);
        let res = self
            .client
            .post(&url)
            .json(records)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        res.error_for_status()
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn clear(&self) -> Result<(), String> {
        let url = format!("{}/userSelections", self.base_url);
        let res = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        res.error_for_status()
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Wraps any mirror so that its failures are logged and swallowed.
///
/// The primary ledger mutation has already happened by the time the mirror
/// is written; a broken mirror must not fail the request.
pub struct BestEffortMirror<M: SelectionMirror> {
    inner: M,
}

impl<M: SelectionMirror> BestEffortMirror<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> M {
        self.inner
    }

    pub async fn add_batch(&self, records: &[SelectionRecord]) {
        if records.is_empty() {
            return;
        }
        if let Err(e) = self.inner.add_batch(records).await {
            warning!("Selection mirror add failed: {}", e);
        }
    }

    pub async fn clear(&self) {
        if let Err(e) = self.inner.clear().await {
            warning!("Selection mirror clear failed: {}", e);
        }
    }
}
