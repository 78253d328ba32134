//! Request logging
//!
//! Every request runs inside a `request` span tagged with the service name
//! and a request id. The bearer extractor adds the caller's username to the
//! span once it has resolved one. One line is logged per response.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{field, Instrument};
use uuid::Uuid;

/// Header carrying the request id, in both directions
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 64;

/// Wrap the request in a span and log its outcome.
///
/// Install with `axum::middleware::from_fn_with_state(SERVICE_NAME, request_tracing)`.
/// A caller-supplied `x-request-id` is reused, otherwise one is generated;
/// either way it is echoed on the response.
pub async fn request_tracing(
    State(service): State<&'static str>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        service,
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        user = field::Empty,
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let elapsed_ms = started.elapsed().as_millis();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status();
    span.in_scope(|| {
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), elapsed_ms = %elapsed_ms, "Request failed");
        } else if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), elapsed_ms = %elapsed_ms, "Request rejected");
        } else {
            tracing::info!(status = status.as_u16(), elapsed_ms = %elapsed_ms, "Request completed");
        }
    });

    response
}

/// Record the authenticated username on the current request span
pub(crate) fn record_user(username: &str) {
    tracing::Span::current().record("user", username);
}
