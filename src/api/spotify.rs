use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

use crate::{
    api::{
        ApiError,
        auth::{bearer_for, current_session},
    },
    server::AppState,
    spotify::client,
};

const SEARCH_LIMIT: u32 = 10;

/// `GET /api/spotify/me` — relays the caller's profile.
pub async fn me(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Value>, ApiError> {
    let bearer = bearer_for(&state, &jar).await?;
    let body = client::get_me(&bearer).await?;
    Ok(Json(body))
}

/// `GET /api/spotify/search?q=&type=` — relays a catalog search.
///
/// The query is remembered on the session so that a repeated identical
/// search does not wipe the pending selections.
pub async fn search(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Value>, ApiError> {
    let bearer = bearer_for(&state, &jar).await?;

    let query = params
        .get("q")
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing search query".to_string()))?;
    let types = params
        .get("type")
        .cloned()
        .unwrap_or_else(|| "track,artist".to_string());

    if let Some(session) = current_session(&state, &jar).await {
        session.lock().await.last_search_query = Some(query.clone());
    }

    let body = client::search(&bearer, query, &types, SEARCH_LIMIT).await?;
    Ok(Json(body))
}

/// `GET /api/spotify/artists/{id}/top-tracks`.
pub async fn top_tracks(
    Path(artist_id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Value>, ApiError> {
    let bearer = bearer_for(&state, &jar).await?;
    let body = client::artist_top_tracks(&bearer, &artist_id).await?;
    Ok(Json(body))
}
