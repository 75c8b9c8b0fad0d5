//! Lifecycle logging macros
//!
//! Every engine operation brackets itself with these so that
//! logs carry the same `component`/`op`/`event` fields everywhere.
//! Extra fields (`collection = ...`, `record_id = %id`) follow the required
//! arguments using ordinary `tracing` field syntax.

/// Log the start of an operation
///
/// ```
/// # use folio_core::log_op_start;
/// log_op_start!("create_record", collection = "blogs");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)+)?
        );
    };
}

/// Log the successful end of an operation with its duration
///
/// ```
/// # use folio_core::log_op_end;
/// log_op_end!("delete_record", duration_ms = 3, record_id = "7");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        );
    };
}

/// Log a failed operation
///
/// The error is converted to `ExError` for its code. Client-caused
/// failures (4xx kinds) are logged at `warn`, everything else at `error`.
///
/// ```
/// # use folio_core::{log_op_error, errors::FolioError};
/// let err = FolioError::not_found("projects", "9");
/// log_op_error!("update_record", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        if ex_err.kind().is_client_facing() {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = $crate::core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_code = ex_err.code(),
                err_message = ex_err.message(),
                $($($field)+)?
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = $crate::core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_code = ex_err.code(),
                err_message = ex_err.message(),
                $($($field)+)?
            );
        }
    }};
}
