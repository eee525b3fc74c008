use std::sync::Arc;

use axum::{Extension, Json, extract::Path};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};

use crate::{
    api::{ApiError, auth::bearer_for},
    management::MAX_SELECTIONS,
    server::AppState,
    spotify::client,
    types::{AddTracksBody, CreatePlaylistBody, CreatePlaylistRequest, SelectionKind},
    utils, warning,
};

/// `POST /api/playlists/create`.
///
/// Resolves the owner via the profile endpoint, creates the playlist, and
/// appends tracks in batches of at most 100 URIs per call (a Web API
/// constraint). When the body carries no explicit track list, the pending
/// selections are used as the working set and consumed: ledger and mirror
/// are cleared once the tracks are on the playlist.
pub async fn create(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<CreatePlaylistBody>,
) -> Result<Json<Value>, ApiError> {
    let bearer = bearer_for(&state, &jar).await?;

    let name = body
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing playlist name".to_string()))?;

    let profile = client::get_me(&bearer).await?;
    let user_id = profile["id"]
        .as_str()
        .ok_or_else(|| ApiError::Internal("Profile response missing user id".to_string()))?
        .to_string();

    let request = CreatePlaylistRequest {
        name,
        description: String::new(),
        public: body.public.unwrap_or(true),
        collaborative: false,
    };
    let playlist = client::create_playlist(&bearer, &user_id, &request).await?;
    let playlist_id = playlist["id"]
        .as_str()
        .ok_or_else(|| ApiError::Internal("Playlist response missing id".to_string()))?
        .to_string();

    let (track_ids, from_ledger) = match body.tracks {
        Some(tracks) => (tracks, false),
        None => {
            let ledger = state.ledger.lock().await;
            let ids = ledger
                .latest(MAX_SELECTIONS)
                .iter()
                .filter(|s| s.kind == SelectionKind::Track)
                .map(|s| s.spotify_id.clone())
                .collect();
            (ids, true)
        }
    };

    let uris: Vec<String> = track_ids.iter().map(|id| utils::track_uri(id)).collect();
    for batch in utils::track_batches(&uris) {
        client::add_tracks(&bearer, &playlist_id, batch.to_vec()).await?;
    }

    if from_ledger && !uris.is_empty() {
        let mut ledger = state.ledger.lock().await;
        ledger.clear();
        if let Err(e) = ledger.persist().await {
            warning!("Failed to persist selection state: {:?}", e);
        }
        drop(ledger);

        if let Some(mirror) = &state.mirror {
            mirror.clear().await;
        }
    }

    Ok(Json(playlist))
}

/// `GET /api/playlists/{id}`.
pub async fn get(
    Path(playlist_id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Value>, ApiError> {
    let bearer = bearer_for(&state, &jar).await?;
    let body = client::get_playlist(&bearer, &playlist_id).await?;
    Ok(Json(body))
}

/// `PUT /api/playlists/{id}/tracks` — batched track appends.
pub async fn add_tracks(
    Path(playlist_id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<AddTracksBody>,
) -> Result<Json<Value>, ApiError> {
    let bearer = bearer_for(&state, &jar).await?;

    let tracks = body
        .tracks
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing tracks".to_string()))?;

    let uris: Vec<String> = tracks.iter().map(|id| utils::track_uri(id)).collect();
    let mut last = json!({});
    for batch in utils::track_batches(&uris) {
        last = client::add_tracks(&bearer, &playlist_id, batch.to_vec()).await?;
    }

    Ok(Json(last))
}
