use crate::app_state::AppState;
use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Instant;

/// Handler for the `/metrics` endpoint.
///
/// Returns whatever the configured backend renders; the no-op backend
/// renders an empty body.
pub async fn metrics_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    // ---
    let metrics_text = app_state.metrics().render();

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics_text,
    )
}

/// Middleware recording latency and status of every routed request.
///
/// Labels use the route template (`/api/tasks/{id}`), not the raw path.
pub async fn track_requests(State(app_state): State<AppState>, request: Request, next: Next) -> Response {
    // ---
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    app_state
        .metrics()
        .record_http_request(start, &path, &method, response.status().as_u16());
    response
}
