//! API Middleware
//!
//! Request tracing for the ingest API. Every request carries an
//! `x-request-id` (taken from the chat adapter or minted here) that is echoed
//! on the response and attached to the request span.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Chat adapter credentials and cookies never reach the logs
const REDACTED_HEADERS: &[&str] = &["authorization", "cookie", "x-adapter-token"];

/// Header pairs safe to log
pub fn loggable_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if REDACTED_HEADERS.contains(&name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[non-ascii]")
            };
            (name.to_string(), shown.to_string())
        })
        .collect()
}

/// Reuse the caller's request id when it is a sane header value.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 64)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let request_id = request_id(request.headers());
    let span = tracing::info_span!(
        "ingest",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let start = std::time::Instant::now();

    async move {
        tracing::debug!(headers = ?loggable_headers(request.headers()), "Request received");

        let mut response = next.run(request).await;
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = %start.elapsed().as_millis(),
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await
}
