use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::model::{CollectionName, Record, RecordId};
use folio_engine::commands::{account, resource};

use super::{public_collection, Message};
use crate::error::ApiResult;
use crate::extract::{AdminAccess, JsonBody};
use crate::state::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
) -> ApiResult<Json<Vec<Record>>> {
    let collection = public_collection(&collection)?;
    Ok(Json(resource::list_records(&state.store, collection).await?))
}

pub async fn list_blogs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(resource::list_records(&state.store, CollectionName::Blogs).await?))
}

pub async fn get_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Record>> {
    let record = resource::get_record(&state.store, CollectionName::Blogs, &RecordId::new(id)).await?;
    Ok(Json(record))
}

pub async fn admin_list(
    _: AdminAccess,
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
) -> ApiResult<Json<Vec<Record>>> {
    let records = match collection.parse::<CollectionName>()? {
        CollectionName::Users => account::list_users(&state.store).await?,
        collection => resource::list_records(&state.store, collection).await?,
    };
    Ok(Json(records))
}

pub async fn create(
    _: AdminAccess,
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    JsonBody(payload): JsonBody,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let record = match collection.parse::<CollectionName>()? {
        CollectionName::Users => account::add_user(&state.store, &payload).await?,
        collection => resource::create_record(&state.store, collection, &payload).await?,
    };
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    _: AdminAccess,
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
    JsonBody(payload): JsonBody,
) -> ApiResult<Json<Message<Record>>> {
    let collection = collection.parse::<CollectionName>()?;
    let record = resource::update_record(&state.store, collection, &RecordId::new(id), &payload).await?;
    Ok(Json(Message::with_record(
        format!("{} record updated", collection),
        record,
    )))
}

pub async fn delete(
    _: AdminAccess,
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<Json<Message>> {
    let id = RecordId::new(id);
    let collection = collection.parse::<CollectionName>()?;
    match collection {
        CollectionName::Users => {
            account::delete_user(&state.store, &id).await?;
        }
        collection => {
            resource::delete_record(&state.store, collection, &id).await?;
        }
    }
    Ok(Json(Message::text(format!("{} record {} deleted", collection, id))))
}
