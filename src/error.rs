//! Error types for the hosted services server
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::worker::WorkerState;

// == Worker Error Enum ==
/// Errors raised by the lifecycle-bound worker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// A suspension was interrupted by the cancellation token
    #[error("Operation was cancelled")]
    Cancelled,

    /// A lifecycle operation was called from a state that does not allow it
    #[error("Invalid worker transition: {from} -> {to}")]
    InvalidTransition { from: WorkerState, to: WorkerState },
}

impl WorkerError {
    /// Returns true for the graceful cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WorkerError::Cancelled)
    }
}

// == Config Error Enum ==
/// Errors raised while loading configuration from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown worker variant name
    #[error("Invalid worker variant: {0} (expected background, hosted, lifecycle or random)")]
    InvalidVariant(String),
}

// == Result Type Alias ==
/// Convenience Result type for worker operations.
pub type Result<T> = std::result::Result<T, WorkerError>;
