use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_core::errors::{ExError, FolioError};
use serde_json::json;

/// Error returned by every handler
///
/// Renders as `{"error": <message>, "code": <ERR_*>}` with the status of the
/// error's kind. Server-side failures carry a generic message; the full
/// error rides along as a response extension for the request log.
#[derive(Debug)]
pub struct ApiError(ExError);

impl ApiError {
    pub fn inner(&self) -> &ExError {
        &self.0
    }
}

impl From<FolioError> for ApiError {
    fn from(err: FolioError) -> Self {
        Self(err.into())
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = StatusCode::from_u16(err.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = json!({
            "error": err.public_message(),
            "code": err.code(),
        });
        let mut response = (status, Json(body)).into_response();
        // picked up by the request middleware, which logs it
        response.extensions_mut().insert(err);
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
