use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request id carried in request extensions for handlers and logs.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tag every request with an id, echoing the caller's `x-request-id` when
/// present and minting a v4 uuid otherwise.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(id.clone()));

    let mut reply = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        reply.headers_mut().insert(X_REQUEST_ID.clone(), value);
    }
    reply
}

/// Log one line per request on arrival and one on completion. Server errors
/// complete at `error`, client errors at `warn`.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    tracing::info!(%method, %path, %request_id, "request started");

    let reply = next.run(request).await;
    let status = reply.status();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    if status.is_server_error() {
        tracing::error!(%method, %path, %request_id, status = status.as_u16(), elapsed_ms, "request finished");
    } else if status.is_client_error() {
        tracing::warn!(%method, %path, %request_id, status = status.as_u16(), elapsed_ms, "request finished");
    } else {
        tracing::info!(%method, %path, %request_id, status = status.as_u16(), elapsed_ms, "request finished");
    }

    reply
}
