use std::sync::Arc;

use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};

use crate::{
    api::{ApiError, auth::current_session},
    management::{LedgerError, MAX_SELECTIONS},
    server::AppState,
    types::{SelectionKey, SelectionRecord, SelectionsRequest},
};

/// `GET /api/selections` — the full ledger, newest first.
pub async fn list(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<SelectionRecord>> {
    let ledger = state.ledger.lock().await;
    Json(ledger.selections().to_vec())
}

/// `GET /api/selections/latest` — the working set for playlist creation.
pub async fn latest(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<SelectionRecord>> {
    let ledger = state.ledger.lock().await;
    Json(ledger.latest(MAX_SELECTIONS).to_vec())
}

/// `POST /api/selections` — action dispatch for ledger mutations.
///
/// `add` inserts a search's picks, `remove` drops whole search groups by
/// key, `clear` empties everything, and `new_search` resets the ledger for
/// a fresh query unless it repeats the session's last one.
pub async fn mutate(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SelectionsRequest>,
) -> Result<Json<Value>, ApiError> {
    match body.action.as_str() {
        "add" => {
            let records: Vec<SelectionRecord> = parse_items(body.selections)?;
            if records.is_empty() {
                return Err(ApiError::BadRequest("Missing selections".to_string()));
            }
            let query = body.search_query.unwrap_or_default();

            let mut ledger = state.ledger.lock().await;
            let batch = ledger.add(records, &query);
            ledger.persist().await.map_err(persist_error)?;
            drop(ledger);

            if let Some(mirror) = &state.mirror {
                mirror.add_batch(&batch).await;
            }

            Ok(Json(json!({
                "message": "Selections added",
                "count": batch.len(),
            })))
        }

        "remove" => {
            let keys: Vec<SelectionKey> = parse_items(body.selections)?;
            if keys.is_empty() {
                return Err(ApiError::BadRequest("Missing selections".to_string()));
            }

            let mut ledger = state.ledger.lock().await;
            let removed = ledger.remove(&keys);
            ledger.persist().await.map_err(persist_error)?;
            let emptied = ledger.is_empty();
            drop(ledger);

            if emptied {
                if let Some(mirror) = &state.mirror {
                    mirror.clear().await;
                }
            }

            Ok(Json(json!({
                "message": "Selections removed",
                "removed": removed,
            })))
        }

        "clear" => {
            let mut ledger = state.ledger.lock().await;
            ledger.clear();
            ledger.persist().await.map_err(persist_error)?;
            drop(ledger);

            if let Some(mirror) = &state.mirror {
                mirror.clear().await;
            }

            Ok(Json(json!({"message": "Selections cleared"})))
        }

        "new_search" => {
            let query = body
                .search_query
                .filter(|q| !q.is_empty())
                .ok_or_else(|| ApiError::BadRequest("Missing search query".to_string()))?;

            // Repeating the previous query must not wipe the picks the
            // user just made from it.
            if let Some(session) = current_session(&state, &jar).await {
                let mut session = session.lock().await;
                if session.last_search_query.as_deref() == Some(query.as_str()) {
                    return Ok(Json(json!({"message": "Duplicate search ignored"})));
                }
                session.last_search_query = Some(query.clone());
            }

            let mut ledger = state.ledger.lock().await;
            ledger.clear();
            ledger.persist().await.map_err(persist_error)?;
            drop(ledger);

            if let Some(mirror) = &state.mirror {
                mirror.clear().await;
            }

            Ok(Json(json!({"message": "Selections reset for new search"})))
        }

        other => Err(ApiError::BadRequest(format!("Unknown action '{}'", other))),
    }
}

fn parse_items<T: serde::de::DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, ApiError> {
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| ApiError::BadRequest(format!("Invalid selection payload: {}", e)))
        })
        .collect()
}

fn persist_error(err: LedgerError) -> ApiError {
    ApiError::Internal(format!("Failed to persist selection state: {:?}", err))
}
