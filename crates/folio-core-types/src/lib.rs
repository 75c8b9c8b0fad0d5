//! Leaf types shared by every folio crate
//!
//! Nothing here depends on the rest of the workspace: request correlation
//! ids, the redacting [`Sensitive`] wrapper, and the field names and
//! header constants used in structured logs.

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
