use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use folio_core::errors::ExError;
use folio_core_types::schema::HEADER_REQUEST_ID;
use folio_core_types::RequestId;
use tracing::Instrument;

/// Accept or mint a request id, tag the request span with it and echo it back
///
/// Error responses are logged here, tagged with the request id: server
/// failures at `error`, rejected requests at `debug`.
pub async fn request_id(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(RequestId::from_header)
        .unwrap_or_default();

    let span = tracing::info_span!("request", request_id = %request_id);
    span.in_scope(|| {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), "request received");
    });

    let mut response = next.run(req).instrument(span).await;

    if let Some(err) = response.extensions_mut().remove::<ExError>() {
        log_failure(err.with_request_id(request_id.clone()));
    }
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(HEADER_REQUEST_ID, value);
    }
    response
}

fn log_failure(err: ExError) {
    let request_id = err.request_id().map(RequestId::as_str).unwrap_or_default();
    if err.kind().is_client_facing() {
        tracing::debug!(request_id, err_code = err.code(), error = %err, "request rejected");
    } else {
        tracing::error!(request_id, err_code = err.code(), error = %err, "request failed");
    }
}
