//! Redacting wrapper for secrets
//!
//! Passwords, signing secrets and API tokens travel through the config
//! loader, the auth commands and the remote store client wrapped in
//! `Sensitive<T>` so they never show up in logs.

use std::fmt;

use serde::{Deserialize, Deserializer};

const REDACTED: &str = "***REDACTED***";

/// A value that formats as `***REDACTED***`
///
/// Deliberately not `Serialize`: a secret can be read from configuration
/// but never written back out.
///
/// ```
/// use folio_core_types::Sensitive;
///
/// let token = Sensitive::from("remote-api-token");
/// assert_eq!(format!("{:?} {}", token, token), "***REDACTED*** ***REDACTED***");
/// assert_eq!(token.expose(), "remote-api-token");
/// ```
#[derive(Clone, Default)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret for hashing, signing or an outgoing header
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self)
    }
}

impl From<&str> for Sensitive<String> {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Sensitive<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}
