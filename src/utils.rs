use rand::{Rng, distr::Alphanumeric};

/// Hard Spotify limit on URIs per playlist-append call.
pub const TRACKS_PER_ADD: usize = 100;

pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

pub fn track_uri(id: &str) -> String {
    format!("spotify:track:{}", id)
}

/// Extracts the bare id from a `spotify:track:<id>` / `spotify:artist:<id>`
/// URI. Returns `None` for anything that is not a three-part spotify URI.
pub fn id_from_uri(uri: &str) -> Option<&str> {
    let mut parts = uri.split(':');
    if parts.next() != Some("spotify") {
        return None;
    }
    match (parts.next(), parts.next(), parts.next()) {
        (Some("track") | Some("artist"), Some(id), None) if !id.is_empty() => Some(id),
        _ => None,
    }
}

pub fn track_batches(uris: &[String]) -> std::slice::Chunks<'_, String> {
    uris.chunks(TRACKS_PER_ADD)
}
