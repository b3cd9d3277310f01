use axum::body::Body;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Logs one line per HTTP request: status, method, path, duration and size.
///
/// The size comes from `Content-Length`; streamed bodies (receipts served
/// from disk) are not buffered just to measure them.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();
    let size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .map(format_number)
        .unwrap_or_else(|| "-".to_string());

    if status.is_server_error() {
        tracing::error!(
            "{} {:>6} {} | {:>5}ms | {:>12}",
            status.as_u16(),
            method,
            path,
            duration.as_millis(),
            size
        );
    } else if status.is_client_error() {
        tracing::warn!(
            "{} {:>6} {} | {:>5}ms | {:>12}",
            status.as_u16(),
            method,
            path,
            duration.as_millis(),
            size
        );
    } else {
        tracing::info!(
            "{} {:>6} {} | {:>5}ms | {:>12}",
            status.as_u16(),
            method,
            path,
            duration.as_millis(),
            size
        );
    }

    response
}
