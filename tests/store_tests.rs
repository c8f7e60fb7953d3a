//! Store scenarios as seen by a presentation layer
//!
//! These drive the public API only: ingest, select, remove, search, and
//! the analytics computed from snapshots.

use callinsight::analytics::{self, CallReport};
use callinsight::ingest::ManualClock;
use callinsight::{
    AppConfig, AudioUpload, CallFilter, CallInsightError, CallStore, IngestEvent, IngestPhase,
    Sentiment,
};
use std::sync::Arc;
use uuid::Uuid;

fn store() -> CallStore {
    CallStore::with_config(AppConfig::default().with_seed(7))
        .with_clock(Arc::new(ManualClock::default()))
        .with_demo_calls()
}

/// Uploading demo.mp3 lands the record first in the list and selects it
#[test]
fn test_ingest_demo_mp3() {
    let store = store();
    let events = store.subscribe();

    let record = store
        .ingest(AudioUpload::new("demo.mp3", "audio/mpeg", 1_500_000))
        .unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.calls[0].id, record.id);
    assert_eq!(snapshot.selected_id, Some(record.id));
    assert_eq!(snapshot.selected_call().map(|c| c.filename.as_str()), Some("demo.mp3"));
    assert_eq!(snapshot.phase, IngestPhase::Done(record.id));
    assert!(record.segments_are_contiguous());

    let hundreds = events
        .try_iter()
        .filter(|e| *e == IngestEvent::Progress(100))
        .count();
    assert_eq!(hundreds, 1);
}

/// Non-audio uploads fail fast and change nothing
#[test]
fn test_ingest_text_file_rejected() {
    let store = store();
    let selected = store.calls()[2].id;
    store.select_call(selected).unwrap();
    let before = store.snapshot();
    let events = store.subscribe();

    let result = store.ingest(AudioUpload::new("notes.txt", "text/plain", 100));

    assert!(matches!(result, Err(CallInsightError::InvalidInput(_))));
    let after = store.snapshot();
    assert_eq!(after.calls, before.calls);
    assert_eq!(after.selected_id, Some(selected));
    assert_eq!(after.phase, IngestPhase::Idle);
    assert!(events.try_recv().is_err(), "no progress should be published");
}

/// Removing the selected call clears the selection
#[test]
fn test_remove_selected_call() {
    let store = store();
    let record = store
        .ingest(AudioUpload::new("demo.mp3", "audio/mpeg", 1024))
        .unwrap();
    assert_eq!(store.selected_id(), Some(record.id));

    store.remove_call(record.id).unwrap();

    assert_eq!(store.selected_id(), None);
    assert!(store.snapshot().calls.iter().all(|c| c.id != record.id));
    assert_eq!(store.len(), 3);
}

/// Unknown ids surface NotFound and leave state alone
#[test]
fn test_unknown_ids() {
    let store = store();
    let id = store.calls()[0].id;
    store.select_call(id).unwrap();
    let unknown = Uuid::new_v4();

    assert_eq!(store.select_call(unknown), Err(CallInsightError::NotFound(unknown)));
    assert!(matches!(
        store.remove_call(unknown),
        Err(CallInsightError::NotFound(_))
    ));
    assert_eq!(store.selected_id(), Some(id));
    assert_eq!(store.len(), 3);
}

/// Selection always resolves to a listed call or nothing
#[test]
fn test_selection_stays_valid_through_mutations() {
    let store = CallStore::with_config(AppConfig::instant().with_seed(5))
        .with_clock(Arc::new(ManualClock::default()));

    let mut ids = Vec::new();
    for i in 0..6 {
        let record = store
            .ingest(AudioUpload::new(format!("call_{}.wav", i), "audio/wav", 10))
            .unwrap();
        ids.push(record.id);
    }

    store.select_call(ids[2]).unwrap();
    for id in ids.iter().step_by(2) {
        store.remove_call(*id).unwrap();
        let snapshot = store.snapshot();
        if let Some(selected) = snapshot.selected_id {
            assert!(snapshot.calls.iter().any(|c| c.id == selected));
        }
    }
    assert_eq!(store.selected_id(), None);
    assert_eq!(store.len(), 3);
}

/// Dashboard figures computed from a live snapshot
#[test]
fn test_report_over_demo_calls() {
    let store = store();
    let calls = store.calls();

    let report = CallReport::from_calls(&calls);
    assert_eq!(report.call_count, 3);
    assert_eq!(report.total_duration_seconds, 187 + 246 + 178);
    assert_eq!(report.distribution.positive, 2);
    assert_eq!(report.distribution.negative, 1);
    assert_eq!(report.distribution.total(), calls.len());
    assert_eq!(report.positive_percent, 67);
    assert_eq!(report.negative_percent, 33);

    // Frustrated and Satisfied both appear twice; Satisfied is seen first
    let top = analytics::top_emotions(&calls, 2);
    let tags: Vec<&str> = top.iter().map(|(t, _)| t.label()).collect();
    assert_eq!(tags, vec!["Satisfied", "Frustrated"]);
    assert!(top.iter().all(|(_, n)| *n == 2));
}

/// Search by text and sentiment over the store
#[test]
fn test_search_calls() {
    let store = store();

    let refunds = store.search(&CallFilter::new().with_query("REFUND"));
    assert_eq!(refunds.len(), 1);
    assert_eq!(refunds[0].filename, "refund_request_delayed_shipment.mp3");

    let positives = store.search(&CallFilter::new().with_sentiment(Sentiment::Positive));
    assert_eq!(positives.len(), 2);

    assert_eq!(store.search(&CallFilter::new()).len(), 3);
}

/// Snapshots serialize for presentation layers
#[test]
fn test_snapshot_serializes() {
    let store = store();
    let id = store.calls()[0].id;
    store.select_call(id).unwrap();

    let json = serde_json::to_value(store.snapshot()).unwrap();
    assert_eq!(json["selectedId"], id.to_string());
    assert_eq!(json["calls"].as_array().map(|a| a.len()), Some(3));
    assert_eq!(json["phase"]["phase"], "idle");
}
