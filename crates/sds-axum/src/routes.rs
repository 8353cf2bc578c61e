//! Route definitions and router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Grid and measurement routes, without state applied.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/queryContainingGeometry",
            post(handlers::grid::query_containing_geometry),
        )
        .route("/mapLocations", post(handlers::grid::map_locations))
        .route("/cells/{name}", get(handlers::grid::cell))
        .route(
            "/queryMeasurements",
            post(handlers::measurements::query_measurements),
        )
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Create the router with all routes, CORS and request tracing.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes().with_state(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
