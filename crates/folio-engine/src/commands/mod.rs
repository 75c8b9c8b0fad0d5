//! Command orchestration layer.
//!
//! Write commands bracket themselves with `log_op_start!`, `log_op_end!`
//! and `log_op_error!`; single-record reads do not. The store below only
//! emits `tracing::debug!` details.

pub mod account;
pub mod blog;
pub mod resource;

use chrono::{SecondsFormat, Utc};
use folio_core::errors::FolioError;
use serde_json::{Map, Value};

use folio_store::Result;

/// Borrow a request body as a JSON object
pub(crate) fn as_object(payload: &Value) -> Result<&Map<String, Value>> {
    payload.as_object().ok_or_else(|| FolioError::InvalidPayload {
        reason: "expected a JSON object".to_string(),
    })
}

/// Current time as an ISO-8601 string with millisecond precision
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
