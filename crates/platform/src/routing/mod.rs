//! Host-based route selection and router assembly.
//!
//! - [`selector`] - the pure decision table from tenancy category and probe
//!   state to a route tree
//! - [`host`] - the HTTP dispatcher that classifies the request's Host
//!   header, resolves the storefront probe, and serves the selected tree
//! - [`app`] - the assembled router: health endpoints on every host, host
//!   dispatch for everything else, ambient middleware layered on top

pub mod host;
pub mod selector;

pub use host::{RouteTrees, dispatch};
pub use selector::{RouteDecision, RouteTree, select};

use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Build the platform router.
///
/// The route trees are prebuilt once and shared; host dispatch picks one
/// per request. Health endpoints sit outside dispatch so they answer on
/// any host.
pub fn app(state: AppState) -> Router {
    let trees = RouteTrees::new(&state);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .fallback(dispatch)
        .layer(Extension(trees))
        .with_state(state)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies backend reachability before returning OK.
/// Returns 503 Service Unavailable if the backend cannot be reached.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.backend().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
