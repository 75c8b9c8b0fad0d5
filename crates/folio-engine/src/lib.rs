//! Folio Engine - Orchestration layer
//!
//! Coordinates field-schema rules from `folio-core` with the collection
//! store from `folio-store`:
//! - Resource CRUD commands shared by every collection
//! - Blog post comment and like commands
//! - Account commands (register, login, profile) and the credential
//!   primitives behind them

pub mod auth;
pub mod commands;

pub use auth::{Claims, TokenSigner};
pub use commands::account::AuthSession;
pub use commands::blog::LikeOutcome;
