// Log levels emitted by the storage layer

use folio_core::logging_facility::init_test_capture;
use folio_store::backend::records_from_value;
use folio_store::{CollectionBackend, FileCacheBackend};
use serde_json::json;
use tracing::Level;

#[tokio::test]
async fn test_malformed_stored_data_logs_at_debug_only() {
    let capture = init_test_capture();

    records_from_value("log-level-records", Some(json!([{"id": 1}, 7])));
    records_from_value("log-level-scalar", Some(json!("text")));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    std::fs::write(&path, b"[ not json").unwrap();
    assert!(FileCacheBackend::new(&path).load("projects").await.unwrap().is_none());

    let events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| {
            e.field("collection").map_or(false, |c| c.starts_with("log-level-"))
                || e.field("path").map_or(false, |p| p.contains(&*dir.path().to_string_lossy()))
        })
        .collect();
    assert_eq!(events.len(), 3, "{:?}", events);
    assert!(events.iter().all(|e| e.level == Level::DEBUG));
}
