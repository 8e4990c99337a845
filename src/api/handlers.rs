//! API Handlers
//!
//! HTTP request handlers for the hosted services endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::models::EndpointResponse;
use crate::supervisor::Supervisor;

/// Application state shared across all handlers.
///
/// Holds the worker's display name captured at boot; handlers never touch
/// the worker itself.
#[derive(Clone, Default)]
pub struct AppState {
    /// Type name of the running worker variant, if any
    pub service_name: Option<Arc<str>>,
}

impl AppState {
    /// Creates a new AppState reporting the given service name.
    pub fn new(service_name: Option<&str>) -> Self {
        Self {
            service_name: service_name.map(Arc::from),
        }
    }

    /// Creates a new AppState from the process supervisor.
    pub fn from_supervisor(supervisor: &Supervisor) -> Self {
        Self::new(Some(supervisor.service_name()))
    }
}

/// Handler for GET /
///
/// Greets the caller and reports which worker variant is running.
pub async fn root_handler(State(state): State<AppState>) -> Json<EndpointResponse> {
    Json(EndpointResponse::hello(state.service_name.as_deref()))
}
