//! Hosted Services - A web server running one background notification worker
//!
//! Starts exactly one of three interchangeable worker variants and reports
//! which one is active over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod supervisor;
pub mod worker;

#[cfg(test)]
mod test_support;

pub use api::AppState;
pub use config::Config;
pub use supervisor::Supervisor;
pub use worker::{Worker, WorkerState, WorkerVariant};
