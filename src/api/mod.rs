//! API Module
//!
//! HTTP handler and routing for the hosted services server.
//!
//! # Endpoints
//! - `GET /` - Greeting reporting the active worker variant

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
