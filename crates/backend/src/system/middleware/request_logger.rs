use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

use crate::shared::format::format_number;

/// Log method, path, status, duration and response size of every request.
///
/// Handler output is emitted inside a `request` span carrying a generated
/// id, so it can be matched with the summary line.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = tracing::info_span!("request", id = %Uuid::new_v4());

    let response = next.run(req).instrument(span.clone()).await;
    let (parts, body) = response.into_parts();
    let status = parts.status.as_u16();

    // Read the body to learn its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            let elapsed = start.elapsed().as_millis();
            span.in_scope(|| {
                tracing::warn!(
                    "{} {} {} | {:>5}ms | body error: {}",
                    status,
                    method,
                    path,
                    elapsed,
                    e
                )
            });
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed = start.elapsed().as_millis();
    let size = format_number(bytes.len());
    span.in_scope(|| {
        if parts.status.is_server_error() {
            tracing::warn!("{} {} {} | {:>5}ms | {:>9} B", status, method, path, elapsed, size);
        } else {
            tracing::info!("{} {} {} | {:>5}ms | {:>9} B", status, method, path, elapsed, size);
        }
    });

    Response::from_parts(parts, Body::from(bytes))
}
