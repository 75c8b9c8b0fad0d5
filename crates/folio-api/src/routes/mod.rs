//! HTTP routes
//!
//! | route | access |
//! |---|---|
//! | `GET /api/:collection`, `GET /api/blogs/:id` | public |
//! | `POST /api/blogs/:id/comments`, `POST /api/blogs/:id/like` | public |
//! | `PUT`/`DELETE /api/blogs/:id/comments/:comment_id` | admin |
//! | `GET`/`POST /api/admin/:collection` | admin |
//! | `PUT`/`DELETE /api/admin/:collection/:id` | admin |
//! | `POST /api/auth/login`, `POST /api/auth/register` | public |
//! | `GET`/`PUT /api/auth/me` | bearer token |
//! | `GET /health` | public |

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{middleware, Router};
use folio_core::errors::FolioError;
use folio_core::model::CollectionName;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod auth;
mod blogs;
mod health;
mod resources;

/// Body of successful update and delete responses
#[derive(Debug, Serialize)]
pub struct Message<T: Serialize = ()> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,
}

impl Message<()> {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            record: None,
        }
    }
}

impl<T: Serialize> Message<T> {
    pub fn with_record(message: impl Into<String>, record: T) -> Self {
        Self {
            message: message.into(),
            record: Some(record),
        }
    }
}

/// Collection named in a public path; `users` is never public
pub(crate) fn public_collection(name: &str) -> Result<CollectionName, FolioError> {
    match name.parse::<CollectionName>()? {
        CollectionName::Users => Err(FolioError::UnknownCollection {
            name: name.to_string(),
        }),
        collection => Ok(collection),
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/:collection", get(resources::list))
        .route("/blogs", get(resources::list_blogs))
        .route("/blogs/:id", get(resources::get_blog))
        .route("/blogs/:id/comments", post(blogs::add_comment))
        .route(
            "/blogs/:id/comments/:comment_id",
            put(blogs::update_comment).delete(blogs::delete_comment),
        )
        .route("/blogs/:id/like", post(blogs::toggle_like))
        .route(
            "/admin/:collection",
            get(resources::admin_list).post(resources::create),
        )
        .route(
            "/admin/:collection/:id",
            put(resources::update).delete(resources::delete),
        )
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me).put(auth::update_me));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(crate::middleware::request_id))
        .with_state(state)
}
