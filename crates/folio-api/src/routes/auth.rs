use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use folio_core::model::Record;
use folio_engine::commands::account;
use folio_engine::AuthSession;

use super::Message;
use crate::error::ApiResult;
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody,
) -> ApiResult<Json<AuthSession>> {
    Ok(Json(account::login(&state.store, &state.signer, &payload).await?))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody,
) -> ApiResult<(StatusCode, Json<AuthSession>)> {
    let session = account::register(&state.store, &state.signer, &payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn me(
    CurrentUser(claims): CurrentUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Record>> {
    Ok(Json(account::me(&state.store, &claims).await?))
}

pub async fn update_me(
    CurrentUser(claims): CurrentUser,
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody,
) -> ApiResult<Json<Message<Record>>> {
    let user = account::update_me(&state.store, &claims, &payload).await?;
    Ok(Json(Message::with_record("Profile updated", user)))
}
