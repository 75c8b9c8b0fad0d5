use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::model::{Comment, Record, RecordId};
use folio_engine::commands::blog;
use folio_engine::LikeOutcome;

use super::Message;
use crate::error::ApiResult;
use crate::extract::{AdminAccess, JsonBody};
use crate::state::AppState;

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = blog::add_comment(&state.store, &RecordId::new(id), &payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    _: AdminAccess,
    State(state): State<Arc<AppState>>,
    Path((id, comment_id)): Path<(String, String)>,
    JsonBody(payload): JsonBody,
) -> ApiResult<Json<Message<Record>>> {
    let comment = blog::update_comment(
        &state.store,
        &RecordId::new(id),
        &RecordId::new(comment_id),
        &payload,
    )
    .await?;
    Ok(Json(Message::with_record("Comment updated", comment)))
}

pub async fn delete_comment(
    _: AdminAccess,
    State(state): State<Arc<AppState>>,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<Message>> {
    blog::delete_comment(&state.store, &RecordId::new(id), &RecordId::new(comment_id)).await?;
    Ok(Json(Message::text("Comment deleted")))
}

pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody,
) -> ApiResult<Json<LikeOutcome>> {
    Ok(Json(blog::toggle_like(&state.store, &RecordId::new(id), &payload).await?))
}
