use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// `degraded` once a write has landed only in the local cache
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let status = if state.store.is_degraded() {
        "degraded"
    } else {
        "ok"
    };
    Json(json!({
        "status": status,
        "backend": state.store.backend_name(),
    }))
}
