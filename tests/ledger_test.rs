use std::path::PathBuf;

use selectify::management::{MAX_SELECTIONS, SelectionLedger};
use selectify::types::{SelectionKey, SelectionKind, SelectionRecord};

// Helper function to create a test selection record
fn record(id: &str, query: &str, selected_at: i64) -> SelectionRecord {
    SelectionRecord {
        spotify_id: id.to_string(),
        name: format!("{}_name", id),
        artist_names: "Test Artist".to_string(),
        image_url: String::new(),
        kind: SelectionKind::Track,
        search_query: query.to_string(),
        selected_at,
    }
}

fn key_for(id: &str) -> SelectionKey {
    SelectionKey {
        id: Some(id.to_string()),
        uri: None,
    }
}

fn ledger_with(records: Vec<SelectionRecord>) -> SelectionLedger {
    SelectionLedger::new(PathBuf::from("selections_test.json"), Some(records))
}

#[test]
fn test_add_never_exceeds_cap() {
    let mut ledger = ledger_with(Vec::new());
    let batch: Vec<SelectionRecord> = (0..15).map(|i| record(&format!("id{}", i), "", 0)).collect();

    ledger.add(batch, "many");

    assert_eq!(ledger.selections().len(), MAX_SELECTIONS);
    // batch order is preserved, so the first records of the batch survive
    assert_eq!(ledger.selections()[0].spotify_id, "id0");
}

#[test]
fn test_add_evicts_oldest_first() {
    let mut ledger = ledger_with(Vec::new());

    let first: Vec<SelectionRecord> = (0..6).map(|i| record(&format!("a{}", i), "", 0)).collect();
    ledger.add(first, "first");
    let second: Vec<SelectionRecord> = (0..6).map(|i| record(&format!("b{}", i), "", 0)).collect();
    ledger.add(second, "second");

    assert_eq!(ledger.selections().len(), MAX_SELECTIONS);
    // the newer batch is intact and leads; the older batch lost its tail
    assert_eq!(ledger.selections()[0].spotify_id, "b0");
    let ids: Vec<&str> = ledger
        .selections()
        .iter()
        .map(|s| s.spotify_id.as_str())
        .collect();
    assert!(ids.contains(&"a0"));
    assert!(!ids.contains(&"a4"));
    assert!(!ids.contains(&"a5"));
}

#[test]
fn test_add_normalizes_records() {
    let mut ledger = ledger_with(Vec::new());
    let mut incoming = record("t1", "ignored", 0);
    incoming.artist_names = "  ".to_string();

    let batch = ledger.add(vec![incoming], "fresh query");

    assert_eq!(batch.len(), 1);
    let stored = &ledger.selections()[0];
    assert_eq!(stored.artist_names, "Unknown Artist");
    assert_eq!(stored.search_query, "fresh query");
    assert!(stored.selected_at > 0);
}

#[test]
fn test_add_empty_batch_is_noop() {
    let mut ledger = ledger_with(vec![record("t1", "q", 100)]);

    let batch = ledger.add(Vec::new(), "anything");

    assert!(batch.is_empty());
    assert_eq!(ledger.selections().len(), 1);
}

#[test]
fn test_remove_cascades_over_search_group() {
    let mut ledger = ledger_with(vec![
        record("q1", "queen", 100),
        record("q2", "queen", 101),
        record("q3", "queen", 102),
        record("a1", "abba", 103),
    ]);
    assert_eq!(ledger.selections().len(), 4);

    let removed = ledger.remove(&[key_for("q2")]);

    // removing one queen pick drops the whole queen batch, nothing else
    assert_eq!(removed, 3);
    assert_eq!(ledger.selections().len(), 1);
    assert_eq!(ledger.selections()[0].spotify_id, "a1");
}

#[test]
fn test_remove_without_group_falls_back_to_single_entry() {
    let mut ledger = ledger_with(vec![
        record("t1", "", 100),
        record("t2", "", 101),
        record("t3", "", 102),
    ]);

    let removed = ledger.remove(&[key_for("t2")]);

    assert_eq!(removed, 1);
    let ids: Vec<&str> = ledger
        .selections()
        .iter()
        .map(|s| s.spotify_id.as_str())
        .collect();
    assert_eq!(ids, vec!["t3", "t1"]);
}

#[test]
fn test_remove_accepts_spotify_uris() {
    let mut ledger = ledger_with(vec![
        record("q1", "queen", 100),
        record("q2", "queen", 101),
        record("a1", "abba", 102),
    ]);

    let removed = ledger.remove(&[SelectionKey {
        id: None,
        uri: Some("spotify:track:q1".to_string()),
    }]);

    assert_eq!(removed, 2);
    assert_eq!(ledger.selections()[0].spotify_id, "a1");
}

#[test]
fn test_remove_unknown_key_changes_nothing() {
    let mut ledger = ledger_with(vec![record("t1", "q", 100)]);

    let removed = ledger.remove(&[key_for("nope"), SelectionKey::default()]);

    assert_eq!(removed, 0);
    assert_eq!(ledger.selections().len(), 1);
}

#[test]
fn test_clear_then_latest_is_empty() {
    let mut ledger = ledger_with(vec![record("t1", "q", 100), record("t2", "q", 101)]);

    ledger.clear();

    assert!(ledger.is_empty());
    assert!(ledger.latest(MAX_SELECTIONS).is_empty());
}

#[test]
fn test_latest_returns_newest_first() {
    let ledger = ledger_with(vec![
        record("oldest", "q", 100),
        record("newest", "q", 300),
        record("middle", "q", 200),
    ]);

    let latest = ledger.latest(2);

    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].spotify_id, "newest");
    assert_eq!(latest[1].spotify_id, "middle");
}

#[tokio::test]
async fn test_persist_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selections.json");

    let ledger = SelectionLedger::new(
        path.clone(),
        Some(vec![record("t1", "q", 100), record("t2", "q", 200)]),
    );
    ledger.persist().await.unwrap();

    let reloaded = SelectionLedger::load(path).await;
    let ids: Vec<&str> = reloaded
        .selections()
        .iter()
        .map(|s| s.spotify_id.as_str())
        .collect();
    assert_eq!(ids, vec!["t2", "t1"]);
}

#[tokio::test]
async fn test_load_missing_file_yields_empty_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = SelectionLedger::load(dir.path().join("does_not_exist.json")).await;
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn test_load_corrupt_file_yields_empty_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selections.json");
    std::fs::write(&path, "not json at all").unwrap();

    let ledger = SelectionLedger::load(path).await;
    assert!(ledger.is_empty());
}
