use std::sync::Mutex;

use selectify::management::{BestEffortMirror, SelectionMirror};
use selectify::types::{SelectionKind, SelectionRecord};

// Fake mirror that records what it is asked to write
struct RecordingMirror {
    batches: Mutex<Vec<Vec<SelectionRecord>>>,
    clears: Mutex<u32>,
    fail: bool,
}

impl RecordingMirror {
    fn new(fail: bool) -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            clears: Mutex::new(0),
            fail,
        }
    }
}

impl SelectionMirror for RecordingMirror {
    async fn add_batch(&self, records: &[SelectionRecord]) -> Result<(), String> {
        if self.fail {
            return Err("mirror store unreachable".to_string());
        }
        self.batches.lock().unwrap().push(records.to_vec());
        Ok(())
    }

    async fn clear(&self) -> Result<(), String> {
        if self.fail {
            return Err("mirror store unreachable".to_string());
        }
        *self.clears.lock().unwrap() += 1;
        Ok(())
    }
}

fn record(id: &str) -> SelectionRecord {
    SelectionRecord {
        spotify_id: id.to_string(),
        name: format!("{}_name", id),
        artist_names: "Test Artist".to_string(),
        image_url: String::new(),
        kind: SelectionKind::Track,
        search_query: "q".to_string(),
        selected_at: 1,
    }
}

#[tokio::test]
async fn test_batches_are_forwarded_to_the_inner_store() {
    let mirror = BestEffortMirror::new(RecordingMirror::new(false));

    mirror.add_batch(&[record("t1"), record("t2")]).await;
    mirror.clear().await;

    let inner = mirror.into_inner();
    let batches = inner.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 2);
    assert_eq!(*inner.clears.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_empty_batches_are_not_forwarded() {
    let mirror = BestEffortMirror::new(RecordingMirror::new(false));

    mirror.add_batch(&[]).await;

    let inner = mirror.into_inner();
    assert!(inner.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_mirror_failures_are_swallowed() {
    let mirror = BestEffortMirror::new(RecordingMirror::new(true));

    // both operations must complete without propagating the failure
    mirror.add_batch(&[record("t1")]).await;
    mirror.clear().await;
}
