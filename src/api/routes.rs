use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use crate::api::handlers;
use crate::api::state::AppState;
use crate::metrics;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat/:session_id", post(handlers::chat))
        .layer(middleware::from_fn(track_http_metrics))
        .with_state(state)
}

/// Records an HTTP turn's worth of metrics around the rest of the stack:
/// in-flight gauge while the handler runs, then count + duration once it
/// returns. Mirrors the budget-tracking shape `orchestrator::run_turn` uses
/// around an LLM call, just at the HTTP layer instead of the agent layer.
async fn track_http_metrics(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    metrics::set_http_requests_in_flight(1);
    let response = next.run(request).await;
    metrics::set_http_requests_in_flight(-1);

    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );

    response
}
