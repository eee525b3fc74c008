use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::{
    config,
    spotify::{self, UpstreamError},
    types::{AddTracksRequest, CreatePlaylistRequest},
};

/// Retrieves the authenticated user's profile (`GET /me`).
///
/// The body is relayed untouched; callers that only need the user id pick
/// it out of the JSON themselves.
pub async fn get_me(bearer: &str) -> Result<Value, UpstreamError> {
    let api_url = format!("{uri}/me", uri = &config::spotify_apiurl());

    let client = spotify::http_client();
    let res = client
        .get(&api_url)
        .header(AUTHORIZATION, bearer)
        .send()
        .await?;

    spotify::relay_json(res).await
}

/// Runs a catalog search (`GET /search`).
pub async fn search(
    bearer: &str,
    query: &str,
    types: &str,
    limit: u32,
) -> Result<Value, UpstreamError> {
    let api_url = format!("{uri}/search", uri = &config::spotify_apiurl());
    let limit = limit.to_string();

    let client = spotify::http_client();
    let res = client
        .get(&api_url)
        .header(AUTHORIZATION, bearer)
        .query(&[("q", query), ("type", types), ("limit", limit.as_str())])
        .send()
        .await?;

    spotify::relay_json(res).await
}

/// Retrieves an artist's top tracks (`GET /artists/{id}/top-tracks`).
pub async fn artist_top_tracks(bearer: &str, artist_id: &str) -> Result<Value, UpstreamError> {
    let api_url = format!(
        "{uri}/artists/{artist_id}/top-tracks",
        uri = &config::spotify_apiurl()
    );

    let client = spotify::http_client();
    let res = client
        .get(&api_url)
        .header(AUTHORIZATION, bearer)
        .send()
        .await?;

    spotify::relay_json(res).await
}

/// Retrieves a playlist (`GET /playlists/{id}`).
pub async fn get_playlist(bearer: &str, playlist_id: &str) -> Result<Value, UpstreamError> {
    let api_url = format!(
        "{uri}/playlists/{playlist_id}",
        uri = &config::spotify_apiurl()
    );

    let client = spotify::http_client();
    let res = client
        .get(&api_url)
        .header(AUTHORIZATION, bearer)
        .send()
        .await?;

    spotify::relay_json(res).await
}

/// Creates a playlist owned by `user_id` (`POST /users/{id}/playlists`).
pub async fn create_playlist(
    bearer: &str,
    user_id: &str,
    request: &CreatePlaylistRequest,
) -> Result<Value, UpstreamError> {
    let api_url = format!(
        "{uri}/users/{user_id}/playlists",
        uri = &config::spotify_apiurl()
    );

    let client = spotify::http_client();
    let res = client
        .post(&api_url)
        .header(AUTHORIZATION, bearer)
        .json(request)
        .send()
        .await?;

    spotify::relay_json(res).await
}

/// Appends one batch of track URIs to a playlist
/// (`POST /playlists/{id}/tracks`).
///
/// Callers batch through [`crate::utils::track_batches`]; a single call
/// must not carry more than 100 URIs.
pub async fn add_tracks(
    bearer: &str,
    playlist_id: &str,
    uris: Vec<String>,
) -> Result<Value, UpstreamError> {
    let api_url = format!(
        "{uri}/playlists/{playlist_id}/tracks",
        uri = &config::spotify_apiurl()
    );

    let client = spotify::http_client();
    let res = client
        .post(&api_url)
        .header(AUTHORIZATION, bearer)
        .json(&AddTracksRequest { uris })
        .send()
        .await?;

    spotify::relay_json(res).await
}
