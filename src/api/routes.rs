//! API Routes
//!
//! Configures the Axum router for the hosted services endpoint.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{root_handler, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /` - Greeting with the active worker variant
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
