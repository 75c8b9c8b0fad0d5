// Integration tests for the remote key-value backend
// A local axum server stands in for the hosted configuration service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use folio_core::errors::FolioError;
use folio_core::model::{CollectionName, Record};
use folio_core_types::Sensitive;
use folio_store::{CollectionBackend, CollectionStore, RemoteKvBackend, RemoteKvConfig};
use serde_json::{json, Value};

const TOKEN: &str = "test-token";

type Items = Arc<Mutex<HashMap<String, Value>>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn denied() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"message": "invalid token"}})),
    )
        .into_response()
}

async fn read_item(State(items): State<Items>, Path(key): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return denied();
    }
    match items.lock().unwrap().get(&key) {
        Some(value) => Json(value.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn write_items(State(items): State<Items>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return denied();
    }
    let mut items = items.lock().unwrap();
    for item in body["items"].as_array().cloned().unwrap_or_default() {
        if item["operation"] == "upsert" {
            let key = item["key"].as_str().unwrap_or_default().to_string();
            items.insert(key, item["value"].clone());
        }
    }
    Json(json!({"status": "success"})).into_response()
}

async fn spawn_fake_service() -> (String, Items) {
    let items: Items = Arc::new(Mutex::new(HashMap::new()));
    let app = Router::new()
        .route("/item/:key", get(read_item))
        .route("/items", patch(write_items))
        .with_state(items.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), items)
}

fn backend(base: &str, token: &str) -> RemoteKvBackend {
    RemoteKvBackend::new(RemoteKvConfig {
        write_url: format!("{}/items", base),
        read_url: base.to_string(),
        token: Sensitive::from(token),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_missing_key_reads_as_absent() {
    let (base, _) = spawn_fake_service().await;
    let remote = backend(&base, TOKEN);
    assert_eq!(remote.load("projects").await.unwrap(), None);
}

#[tokio::test]
async fn test_save_sends_upsert_item_and_reads_back() {
    let (base, items) = spawn_fake_service().await;
    let store = CollectionStore::new(Arc::new(backend(&base, TOKEN)));

    store
        .upsert(
            CollectionName::Projects,
            Record::from_value(json!({"title": "Remote"})).unwrap(),
        )
        .await
        .unwrap();

    let stored = items.lock().unwrap().get("projects").cloned();
    assert_eq!(stored, Some(json!([{"id": 1, "title": "Remote"}])));

    let records = store.fetch_collection(CollectionName::Projects).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get_str("title"), Some("Remote"));
}

#[tokio::test]
async fn test_rejected_token_surfaces_service_message() {
    let (base, _) = spawn_fake_service().await;
    let remote = backend(&base, "wrong");

    let err = remote.save("projects", &[]).await.unwrap_err();
    match err {
        FolioError::StoreUnavailable { backend, message } => {
            assert_eq!(backend, "remote");
            assert!(message.contains("invalid token"), "got: {}", message);
        }
        other => panic!("expected StoreUnavailable, got {:?}", other),
    }

    let err = remote.load("projects").await.unwrap_err();
    assert!(matches!(err, FolioError::StoreUnavailable { .. }));
}

#[tokio::test]
async fn test_unreachable_service_is_store_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remote = backend(&format!("http://{}", addr), TOKEN);
    let err = remote.load("blogs").await.unwrap_err();
    assert!(matches!(err, FolioError::StoreUnavailable { .. }));
}

#[test]
fn test_config_debug_redacts_token() {
    let config = RemoteKvConfig {
        write_url: "http://kv.local/items".to_string(),
        read_url: "http://kv.local".to_string(),
        token: Sensitive::from("super-secret"),
        timeout: Duration::from_secs(1),
    };
    let text = format!("{:?}", config);
    assert!(!text.contains("super-secret"));
}
