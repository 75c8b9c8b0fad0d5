//! Request correlation
//!
//! Every HTTP request gets a [`RequestId`], either the caller's
//! `x-request-id` or a fresh UUIDv7. It tags the request span and any
//! error the request produces.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest caller-supplied id that is accepted as is
pub const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Fresh time-ordered id
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Reuse a header value, minting a fresh id if it is blank or too long
    pub fn from_header(value: &str) -> Self {
        match value.trim() {
            "" => Self::new(),
            v if v.len() > MAX_REQUEST_ID_LEN => Self::new(),
            v => Self(v.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
