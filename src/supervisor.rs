//! Process Supervisor
//!
//! Owns the single worker for the lifetime of the process: picks the
//! variant at boot, starts it, and stops it once shutdown is requested.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::worker::{build_worker, Worker, WorkerState, WorkerVariant};

/// Exclusive owner of the process's worker.
pub struct Supervisor {
    variant: WorkerVariant,
    worker: Worker,
    shutdown: CancellationToken,
    shutdown_timeout: Duration,
}

impl Supervisor {
    /// Resolves the configured variant and builds its worker.
    ///
    /// `shutdown` is the process-wide cancellation token; the worker's
    /// suspensions all observe it.
    pub fn new(config: &Config, shutdown: CancellationToken) -> Self {
        let variant = config.variant.resolve();
        let worker = build_worker(variant, config);
        info!("*** Service Registered: {} ***", variant.type_name());

        Self {
            variant,
            worker,
            shutdown,
            shutdown_timeout: config.shutdown_timeout(),
        }
    }

    pub fn variant(&self) -> WorkerVariant {
        self.variant
    }

    /// Display name reported by the HTTP endpoint.
    pub fn service_name(&self) -> &'static str {
        self.variant.type_name()
    }

    pub fn worker_state(&self) -> WorkerState {
        self.worker.state()
    }

    /// Handle on the shutdown token, for wiring signal handlers.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Starts the worker bound to the shutdown token.
    pub async fn start(&mut self) -> Result<()> {
        self.worker.start(self.shutdown.clone()).await
    }

    /// Stops the worker, waiting at most `shutdown_timeout` for its loop to
    /// end, then cancels the shutdown token.
    ///
    /// The worker cancels its own loop after firing `stopping`, so when no
    /// signal has fired yet the stop hooks log ahead of the loop's exit.
    pub async fn stop(&mut self) -> Result<()> {
        let result = self.worker.stop_within(self.shutdown_timeout).await;
        self.shutdown.cancel();
        info!("Worker {} stopped", self.worker.name());
        result
    }
}
