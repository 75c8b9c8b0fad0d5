//! Blog post comment and like commands.
//!
//! Comments and likes live inside the blog post record (`comments` and
//! `likes` arrays), so every change here rewrites the whole `blogs`
//! collection like any other mutation.

use std::time::Instant;

use folio_core::errors::FolioError;
use folio_core::model::{CollectionName, Comment, IdPolicy, Record, RecordId};
use folio_core::ops;
use folio_core::rules::require_fields;
use folio_core::{log_op_end, log_op_error, log_op_start};
use folio_store::{CollectionStore, Result};
use serde::Serialize;
use serde_json::Value;

use super::{as_object, elapsed_ms, now_iso};

const BLOGS: CollectionName = CollectionName::Blogs;

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    /// Number of likes after the toggle
    pub likes: usize,
    /// Whether the user now likes the post
    pub liked: bool,
}

fn find_blog<'a>(records: &'a mut [Record], blog_id: &RecordId) -> Result<&'a mut Record> {
    records
        .iter_mut()
        .find(|r| r.has_id(blog_id))
        .ok_or_else(|| FolioError::not_found(BLOGS.as_str(), blog_id.as_str()))
}

/// Detach the comment list from a post; a missing or malformed list is empty
fn take_comments(blog: &mut Record) -> Vec<Record> {
    match blog.remove("comments") {
        Some(Value::Array(items)) => items.into_iter().filter_map(Record::from_value).collect(),
        _ => Vec::new(),
    }
}

fn put_comments(blog: &mut Record, comments: Vec<Record>) {
    let items: Vec<Value> = comments.into_iter().map(Record::into_value).collect();
    blog.insert("comments", Value::Array(items));
}

fn comment_not_found(blog_id: &RecordId, comment_id: &RecordId) -> FolioError {
    FolioError::CommentNotFound {
        blog_id: blog_id.to_string(),
        comment_id: comment_id.to_string(),
    }
}

/// Append a reader comment to a blog post
///
/// ## Errors
///
/// - `MissingFields`: `name` or `comment` absent or blank
/// - `RecordNotFound`: no post has `blog_id`
/// - `StoreUnavailable`: backend unreachable
pub async fn add_comment(
    store: &CollectionStore,
    blog_id: &RecordId,
    payload: &Value,
) -> Result<Comment> {
    log_op_start!("add_comment", record_id = blog_id.as_str());
    let start = Instant::now();

    let result = add_comment_impl(store, blog_id, payload).await.map_err(|e| {
        log_op_error!(
            "add_comment",
            e.clone(),
            duration_ms = elapsed_ms(start),
            record_id = blog_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "add_comment",
        duration_ms = elapsed_ms(start),
        record_id = blog_id.as_str(),
        comment_id = result.id.as_str()
    );
    Ok(result)
}

async fn add_comment_impl(
    store: &CollectionStore,
    blog_id: &RecordId,
    payload: &Value,
) -> Result<Comment> {
    let body = as_object(payload)?;
    require_fields("comment", body, &["name", "comment"])?;
    let name = body.get("name").and_then(Value::as_str).unwrap_or_default().trim().to_string();
    let text = body.get("comment").and_then(Value::as_str).unwrap_or_default().trim().to_string();

    store
        .modify(BLOGS, move |records| {
            let blog = find_blog(records, blog_id)?;
            let mut comments = take_comments(blog);

            let id = match ops::next_id(&comments, IdPolicy::Timestamp) {
                Value::String(s) => s,
                other => other.to_string(),
            };
            let comment = Comment::new(id, name, text);
            comments.push(serde_json::from_value(serde_json::to_value(&comment)?)?);

            put_comments(blog, comments);
            Ok(comment)
        })
        .await
}

/// Replace the text of a comment
///
/// Returns the updated comment as stored.
///
/// ## Errors
///
/// - `MissingFields`: `comment` absent or blank
/// - `RecordNotFound` / `CommentNotFound`
/// - `StoreUnavailable`: backend unreachable
pub async fn update_comment(
    store: &CollectionStore,
    blog_id: &RecordId,
    comment_id: &RecordId,
    payload: &Value,
) -> Result<Record> {
    log_op_start!(
        "update_comment",
        record_id = blog_id.as_str(),
        comment_id = comment_id.as_str()
    );
    let start = Instant::now();

    let result = update_comment_impl(store, blog_id, comment_id, payload)
        .await
        .map_err(|e| {
            log_op_error!(
                "update_comment",
                e.clone(),
                duration_ms = elapsed_ms(start),
                record_id = blog_id.as_str(),
                comment_id = comment_id.as_str()
            );
            e
        })?;

    log_op_end!(
        "update_comment",
        duration_ms = elapsed_ms(start),
        record_id = blog_id.as_str(),
        comment_id = comment_id.as_str()
    );
    Ok(result)
}

async fn update_comment_impl(
    store: &CollectionStore,
    blog_id: &RecordId,
    comment_id: &RecordId,
    payload: &Value,
) -> Result<Record> {
    let body = as_object(payload)?;
    require_fields("comment", body, &["comment"])?;
    let text = body.get("comment").and_then(Value::as_str).unwrap_or_default().trim().to_string();

    store
        .modify(BLOGS, move |records| {
            let blog = find_blog(records, blog_id)?;
            let mut comments = take_comments(blog);

            let updated = match comments.iter_mut().find(|c| c.has_id(comment_id)) {
                Some(comment) => {
                    comment.insert("comment", text);
                    comment.insert("updatedAt", now_iso());
                    comment.clone()
                }
                None => return Err(comment_not_found(blog_id, comment_id)),
            };

            put_comments(blog, comments);
            Ok(updated)
        })
        .await
}

/// Remove a comment from a blog post
///
/// ## Errors
///
/// - `RecordNotFound` / `CommentNotFound` (nothing is written)
/// - `StoreUnavailable`: backend unreachable
pub async fn delete_comment(
    store: &CollectionStore,
    blog_id: &RecordId,
    comment_id: &RecordId,
) -> Result<()> {
    log_op_start!(
        "delete_comment",
        record_id = blog_id.as_str(),
        comment_id = comment_id.as_str()
    );
    let start = Instant::now();

    store
        .modify(BLOGS, |records| {
            let blog = find_blog(records, blog_id)?;
            let mut comments = take_comments(blog);
            if ops::remove_from(&mut comments, comment_id).is_none() {
                return Err(comment_not_found(blog_id, comment_id));
            }
            put_comments(blog, comments);
            Ok(())
        })
        .await
        .map_err(|e| {
            log_op_error!(
                "delete_comment",
                e.clone(),
                duration_ms = elapsed_ms(start),
                record_id = blog_id.as_str()
            );
            e
        })?;

    log_op_end!(
        "delete_comment",
        duration_ms = elapsed_ms(start),
        record_id = blog_id.as_str(),
        comment_id = comment_id.as_str()
    );
    Ok(())
}

/// Add `userId` to the post's likes, or remove it if already present
///
/// ## Errors
///
/// - `MissingFields`: `userId` absent, blank, or not a string or integer
/// - `RecordNotFound`: no post has `blog_id`
/// - `StoreUnavailable`: backend unreachable
pub async fn toggle_like(
    store: &CollectionStore,
    blog_id: &RecordId,
    payload: &Value,
) -> Result<LikeOutcome> {
    log_op_start!("toggle_like", record_id = blog_id.as_str());
    let start = Instant::now();

    let result = toggle_like_impl(store, blog_id, payload).await.map_err(|e| {
        log_op_error!(
            "toggle_like",
            e.clone(),
            duration_ms = elapsed_ms(start),
            record_id = blog_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "toggle_like",
        duration_ms = elapsed_ms(start),
        record_id = blog_id.as_str(),
        liked = result.liked,
        likes = result.likes
    );
    Ok(result)
}

async fn toggle_like_impl(
    store: &CollectionStore,
    blog_id: &RecordId,
    payload: &Value,
) -> Result<LikeOutcome> {
    let body = as_object(payload)?;
    let raw_user = body.get("userId").cloned().unwrap_or(Value::Null);
    let user = RecordId::from_value(&raw_user).ok_or_else(|| FolioError::MissingFields {
        collection: "like".to_string(),
        fields: vec!["userId".to_string()],
    })?;

    store
        .modify(BLOGS, move |records| {
            let blog = find_blog(records, blog_id)?;
            let mut likes = match blog.remove("likes") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };

            let existing = likes
                .iter()
                .position(|v| RecordId::from_value(v).as_ref() == Some(&user));
            let liked = match existing {
                Some(idx) => {
                    likes.remove(idx);
                    false
                }
                None => {
                    likes.push(raw_user);
                    true
                }
            };

            let outcome = LikeOutcome {
                likes: likes.len(),
                liked,
            };
            blog.insert("likes", Value::Array(likes));
            Ok(outcome)
        })
        .await
}
