//! Logging middleware for request/response tracking

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn, Instrument};

/// Request logging middleware that tracks all HTTP requests
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    // Matched path keeps log grouping stable across query strings
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str())
        .unwrap_or_else(|| uri.path())
        .to_string();

    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|header| header.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|header| header.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let span = tracing::info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = %request_id,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );

    async move {
        info!(uri = %uri, user_agent = %user_agent, "Request started");

        let response = next.run(request).await;

        let duration = start_time.elapsed();
        let status = response.status();

        let span = tracing::Span::current();
        span.record("status", status.as_u16());
        span.record("duration_ms", duration.as_millis() as u64);

        match status {
            status if status.is_server_error() => {
                error!(
                    status = %status,
                    duration_ms = duration.as_millis() as u64,
                    "Request completed with server error"
                );
            }
            status if status.is_client_error() => {
                warn!(
                    status = %status,
                    duration_ms = duration.as_millis() as u64,
                    "Request completed with client error"
                );
            }
            _ => {
                info!(
                    status = %status,
                    duration_ms = duration.as_millis() as u64,
                    "Request completed successfully"
                );
            }
        }

        response
    }
    .instrument(span)
    .await
}
