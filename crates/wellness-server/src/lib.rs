//! HTTP layer for the wellness router.
//!
//! [`build_router`] wires the handlers to a shared [`ServerState`]. Every
//! route except `/health` runs inside a request trace span; CORS is open.

pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use wellness_engine::WellnessOrchestrator;

/// Shared server state accessible from all handlers.
pub struct ServerState {
    pub orchestrator: WellnessOrchestrator,
}

impl ServerState {
    pub fn new(orchestrator: WellnessOrchestrator) -> Self {
        Self { orchestrator }
    }
}

/// Builds the application router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/wellness/query", post(handlers::wellness::query))
        .route("/wellness/intents", get(handlers::wellness::intents))
        .route(
            "/wellness/memory/{user_id}",
            get(handlers::memory::stats).delete(handlers::memory::clear),
        )
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(cors)
        .with_state(state)
}
