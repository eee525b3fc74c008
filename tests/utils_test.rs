use selectify::utils::*;

#[test]
fn test_generate_session_id() {
    let id = generate_session_id();

    // Should be exactly 64 characters
    assert_eq!(id.len(), 64);

    // Should contain only alphanumeric characters
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated ids should be different
    let id2 = generate_session_id();
    assert_ne!(id, id2);
}

#[test]
fn test_track_uri() {
    assert_eq!(track_uri("4uLU6hMCjMI75M1A2tKUQC"), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
}

#[test]
fn test_id_from_uri_valid_inputs() {
    assert_eq!(id_from_uri("spotify:track:abc123"), Some("abc123"));
    assert_eq!(id_from_uri("spotify:artist:xyz789"), Some("xyz789"));
}

#[test]
fn test_id_from_uri_invalid_inputs() {
    // wrong scheme
    assert_eq!(id_from_uri("http:track:abc"), None);
    // unsupported kind
    assert_eq!(id_from_uri("spotify:album:abc"), None);
    // missing id
    assert_eq!(id_from_uri("spotify:track:"), None);
    assert_eq!(id_from_uri("spotify:track"), None);
    // trailing segment
    assert_eq!(id_from_uri("spotify:track:abc:extra"), None);
    // bare id
    assert_eq!(id_from_uri("abc123"), None);
}

#[test]
fn test_track_batches_splits_at_the_api_limit() {
    let uris: Vec<String> = (0..150).map(|i| format!("spotify:track:{}", i)).collect();

    let batches: Vec<&[String]> = track_batches(&uris).collect();

    // 150 tracks means two append calls: 100 + 50
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 100);
    assert_eq!(batches[1].len(), 50);
}

#[test]
fn test_track_batches_exact_limit_is_one_batch() {
    let uris: Vec<String> = (0..100).map(|i| format!("spotify:track:{}", i)).collect();

    let batches: Vec<&[String]> = track_batches(&uris).collect();

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 100);
}

#[test]
fn test_track_batches_empty_input_yields_no_batches() {
    let uris: Vec<String> = Vec::new();
    assert_eq!(track_batches(&uris).count(), 0);
}
