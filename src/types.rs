use serde::{Deserialize, Serialize};

/// Token material returned by the accounts server for any grant type.
///
/// `refresh_token` is optional because the provider only rotates it
/// sometimes; a refresh response without one means the stored refresh token
/// stays valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Server-held state for one browser client.
///
/// `expires_at` is epoch seconds UTC; it is only ever written from
/// `Utc::now().timestamp() + expires_in` and compared against the same
/// clock, so no mixed timestamp representations can occur.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
    pub last_search_query: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Track,
    Artist,
}

/// A user-picked track or artist awaiting inclusion in a playlist.
///
/// Field names follow the frontend contract (camelCase). `selected_at` is
/// epoch milliseconds UTC and is stamped server-side on add.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    pub spotify_id: String,
    pub name: String,
    #[serde(default)]
    pub artist_names: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(rename = "type")]
    pub kind: SelectionKind,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub selected_at: i64,
}

/// Removal key for a selection: either the bare Spotify id or a full
/// `spotify:track:...` / `spotify:artist:...` URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionKey {
    #[serde(default, alias = "spotifyId")]
    pub id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Action-dispatch body for `POST /api/selections`.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionsRequest {
    pub action: String,
    #[serde(default)]
    pub selections: Vec<serde_json::Value>,
    #[serde(default, rename = "searchQuery")]
    pub search_query: Option<String>,
}

/// Incoming body for `POST /api/playlists/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylistBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub tracks: Option<Vec<String>>,
}

/// Incoming body for `PUT /api/playlists/{id}/tracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddTracksBody {
    #[serde(default)]
    pub tracks: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}
