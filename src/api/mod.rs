//! HTTP API for the presentation layer
//!
//! Two endpoints behind a uniform envelope:
//! - `/api/v1/conditions` - latest verdict, factor analyses, displayed text,
//!   and the "still validating" flag
//! - `/api/v1/health` - liveness

pub mod envelope;
pub mod handlers;

pub use handlers::DashboardState;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn create_app(state: DashboardState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/conditions", get(handlers::get_conditions))
        .route("/health", get(handlers::get_health))
        .with_state(state)
}
