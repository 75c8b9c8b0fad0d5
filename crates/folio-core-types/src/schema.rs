//! Field and event names shared by the logging macros, the test capture
//! layer and the HTTP layer

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
/// Stable `ERR_*` code attached to failure events
pub const FIELD_ERR_CODE: &str = "err_code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// Header carrying the request id in and out of the HTTP layer
pub const HEADER_REQUEST_ID: &str = "x-request-id";
