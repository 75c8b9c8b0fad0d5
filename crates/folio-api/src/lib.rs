//! Folio API - HTTP surface of the portfolio backend
//!
//! axum router over the engine commands, with:
//! - JSON error bodies `{"error", "code"}` mapped from `ExErrorKind`
//! - Bearer-token and admin extractors
//! - Request id propagation (`x-request-id`)
//! - Layered configuration (`folio.toml`, `FOLIO_*` environment)

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::FolioConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use server::serve;
pub use state::AppState;
