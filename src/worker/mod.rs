//! Worker Module
//!
//! The lifecycle-bound periodic worker and the notification services built
//! on top of it.
//!
//! # Components
//! - `periodic`: the worker itself (start/stop lifecycle, work loop)
//! - `hooks`: lifecycle hook types and the cancellable delay
//! - `state`: forward-only lifecycle state
//! - `variants`: the three notification services

mod hooks;
mod periodic;
mod state;
mod variants;


pub use hooks::{delay, HookFuture, LifecycleHooks, StartHook, StopHook, WorkUnit};
pub use periodic::{Worker, WorkerSettings};
pub use state::{StateCell, WorkerState};
pub use variants::{build_worker, VariantSelection, WorkerVariant};
