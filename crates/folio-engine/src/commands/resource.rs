//! Resource command handlers with boundary logging.
//!
//! One set of commands serves experiences, education, projects and blog
//! posts. Each collection's field schema (`folio_core::rules`) is applied
//! before the store is touched, so a rejected payload never costs a fetch.
//!
//! Users are not handled here; see `commands::account`.

use std::time::Instant;

use folio_core::errors::FolioError;
use folio_core::model::{CollectionName, Record, RecordId};
use folio_core::rules::schema_for;
use folio_core::{log_op_end, log_op_error, log_op_start};
use folio_store::{CollectionStore, Result};
use serde_json::{json, Value};

use super::{as_object, elapsed_ms, now_iso};

fn ensure_resource(collection: CollectionName) -> Result<()> {
    if collection == CollectionName::Users {
        return Err(FolioError::InvalidField {
            field: "collection".to_string(),
            reason: "users are managed through account commands".to_string(),
        });
    }
    Ok(())
}

/// All records of a collection in stored order
///
/// # Errors
///
/// - `InvalidField`: `collection` is `users`
/// - `StoreUnavailable`: backend unreachable
pub async fn list_records(store: &CollectionStore, collection: CollectionName) -> Result<Vec<Record>> {
    log_op_start!("list_records", collection = collection.as_str());
    let start = Instant::now();

    let checked = ensure_resource(collection);
    let result = match checked {
        Ok(()) => store.fetch_collection(collection).await,
        Err(e) => Err(e),
    }
    .map_err(|e| {
        log_op_error!(
            "list_records",
            e.clone(),
            duration_ms = elapsed_ms(start),
            collection = collection.as_str()
        );
        e
    })?;

    log_op_end!(
        "list_records",
        duration_ms = elapsed_ms(start),
        collection = collection.as_str(),
        record_count = result.len()
    );
    Ok(result)
}

/// One record by id
///
/// # Errors
///
/// - `RecordNotFound`: no record has `id`
/// - `StoreUnavailable`: backend unreachable
pub async fn get_record(
    store: &CollectionStore,
    collection: CollectionName,
    id: &RecordId,
) -> Result<Record> {
    ensure_resource(collection)?;
    store.get(collection, id).await
}

/// Validate a payload and append it as a new record
///
/// The record gets the next id under the collection's policy. Blog posts
/// additionally start with empty `comments` and `likes` and a `createdAt`
/// stamp.
///
/// ## Returns
///
/// The record as stored, including its assigned `id`
///
/// ## Errors
///
/// - `InvalidPayload`: body is not a JSON object
/// - `MissingFields` / `InvalidField`: schema check failed
/// - `StoreUnavailable`: backend unreachable
pub async fn create_record(
    store: &CollectionStore,
    collection: CollectionName,
    payload: &Value,
) -> Result<Record> {
    log_op_start!("create_record", collection = collection.as_str());
    let start = Instant::now();

    let result = create_record_impl(store, collection, payload)
        .await
        .map_err(|e| {
            log_op_error!(
                "create_record",
                e.clone(),
                duration_ms = elapsed_ms(start),
                collection = collection.as_str()
            );
            e
        })?;

    log_op_end!(
        "create_record",
        duration_ms = elapsed_ms(start),
        collection = collection.as_str(),
        record_id = %result.id().map(|id| id.to_string()).unwrap_or_default()
    );
    Ok(result)
}

async fn create_record_impl(
    store: &CollectionStore,
    collection: CollectionName,
    payload: &Value,
) -> Result<Record> {
    ensure_resource(collection)?;
    let mut record = schema_for(collection).accept(as_object(payload)?)?;

    if collection == CollectionName::Blogs {
        record.insert("createdAt", now_iso());
        record.insert("comments", json!([]));
        record.insert("likes", json!([]));
    }

    let (stored, _) = store.upsert(collection, record).await?;
    Ok(stored)
}

/// Validate a payload and merge it onto an existing record
///
/// `id` and server-managed fields (`createdAt`, `comments`, `likes`) are
/// kept from the stored record. Blog posts get an `updatedAt` stamp.
///
/// ## Errors
///
/// - `MissingFields` / `InvalidField`: schema check failed (checked before
///   the lookup)
/// - `RecordNotFound`: no record has `id`
/// - `StoreUnavailable`: backend unreachable
pub async fn update_record(
    store: &CollectionStore,
    collection: CollectionName,
    id: &RecordId,
    payload: &Value,
) -> Result<Record> {
    log_op_start!("update_record", collection = collection.as_str(), record_id = id.as_str());
    let start = Instant::now();

    let result = update_record_impl(store, collection, id, payload)
        .await
        .map_err(|e| {
            log_op_error!(
                "update_record",
                e.clone(),
                duration_ms = elapsed_ms(start),
                collection = collection.as_str(),
                record_id = id.as_str()
            );
            e
        })?;

    log_op_end!(
        "update_record",
        duration_ms = elapsed_ms(start),
        collection = collection.as_str(),
        record_id = id.as_str()
    );
    Ok(result)
}

async fn update_record_impl(
    store: &CollectionStore,
    collection: CollectionName,
    id: &RecordId,
    payload: &Value,
) -> Result<Record> {
    ensure_resource(collection)?;
    let changes = schema_for(collection).accept(as_object(payload)?)?;

    store
        .modify(collection, move |records| {
            let existing = records
                .iter_mut()
                .find(|r| r.has_id(id))
                .ok_or_else(|| FolioError::not_found(collection.as_str(), id.as_str()))?;
            existing.merge(changes);
            if collection == CollectionName::Blogs {
                existing.insert("updatedAt", now_iso());
            }
            Ok(existing.clone())
        })
        .await
}

/// Remove a record
///
/// ## Errors
///
/// - `RecordNotFound`: no record has `id` (nothing is written)
/// - `StoreUnavailable`: backend unreachable
pub async fn delete_record(
    store: &CollectionStore,
    collection: CollectionName,
    id: &RecordId,
) -> Result<Record> {
    log_op_start!("delete_record", collection = collection.as_str(), record_id = id.as_str());
    let start = Instant::now();

    let checked = ensure_resource(collection);
    let result = match checked {
        Ok(()) => store.remove(collection, id).await,
        Err(e) => Err(e),
    }
    .map_err(|e| {
        log_op_error!(
            "delete_record",
            e.clone(),
            duration_ms = elapsed_ms(start),
            collection = collection.as_str(),
            record_id = id.as_str()
        );
        e
    })?;

    log_op_end!(
        "delete_record",
        duration_ms = elapsed_ms(start),
        collection = collection.as_str(),
        record_id = id.as_str()
    );
    Ok(result)
}
