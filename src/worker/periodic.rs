//! Lifecycle-Bound Periodic Worker
//!
//! Runs a unit of work on a fixed interval inside its own tokio task until
//! its cancellation token fires. Start hooks are awaited in order before the
//! loop is spawned; stop hooks are fired synchronously around the loop's
//! shutdown. A worker built without a work unit only runs its hooks.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::hooks::{delay, LifecycleHooks, WorkUnit};
use super::state::{StateCell, WorkerState};
use crate::error::{Result, WorkerError};

/// Timing of the work loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Suspension between two work units
    pub interval: Duration,
    /// The counter runs 1..=batch_size, then restarts at 1
    pub batch_size: u32,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5000),
            batch_size: 5,
        }
    }
}

/// A cancellable periodic background task with lifecycle hooks.
///
/// The worker is owned by a single supervisor. Its state only moves forward
/// and a stopped worker cannot be restarted.
pub struct Worker {
    name: String,
    hooks: LifecycleHooks,
    work: Option<WorkUnit>,
    settings: WorkerSettings,
    state: Arc<StateCell>,
    loop_cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Creates a worker with no hooks and default settings.
    pub fn new(name: impl Into<String>, work: impl Fn(u32) + Send + Sync + 'static) -> Self {
        let mut worker = Self::idle(name);
        worker.work = Some(Arc::new(work));
        worker
    }

    /// Creates a worker with no work unit: it runs its hooks and never loops.
    pub fn idle(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: LifecycleHooks::default(),
            work: None,
            settings: WorkerSettings::default(),
            state: Arc::new(StateCell::new()),
            loop_cancel: None,
            handle: None,
        }
    }

    pub fn with_hooks(mut self, hooks: LifecycleHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_settings(mut self, settings: WorkerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    pub fn settings(&self) -> WorkerSettings {
        self.settings
    }

    pub fn has_work(&self) -> bool {
        self.work.is_some()
    }

    /// Runs the start hooks, then spawns the work loop if there is one.
    ///
    /// Cancellation during a start hook is a graceful outcome: the loop is
    /// never spawned, the worker moves to `Stopping` and `Ok` is returned.
    pub async fn start(&mut self, cancel: CancellationToken) -> Result<()> {
        self.advance(WorkerState::Starting)?;
        debug!(worker = %self.name, "Worker starting");

        match self.hooks.run_start(&cancel).await {
            Ok(()) => {}
            Err(WorkerError::Cancelled) => {
                info!(worker = %self.name, "Task was canceled gracefully...");
                self.advance(WorkerState::Stopping)?;
                return Ok(());
            }
            Err(err) => return Err(err),
        }

        self.advance(WorkerState::Running)?;

        if let Some(work) = &self.work {
            let token = cancel.child_token();
            self.handle = Some(tokio::spawn(run_loop(
                self.name.clone(),
                Arc::clone(work),
                self.settings,
                Arc::clone(&self.state),
                token.clone(),
            )));
            self.loop_cancel = Some(token);
        }

        debug!(worker = %self.name, "Worker running");
        Ok(())
    }

    /// Stops the work loop and fires the stop hooks.
    ///
    /// `stopping` fires before the worker cancels its loop, `stop` right
    /// after, and `stopped` once the loop task has ended. If `cancel` fires
    /// before the loop ends, the loop task is aborted.
    pub async fn stop(&mut self, cancel: CancellationToken) -> Result<()> {
        self.shutdown(cancel.cancelled()).await
    }

    /// Same as [`Worker::stop`], aborting the loop if it has not ended
    /// within `timeout`.
    pub async fn stop_within(&mut self, timeout: Duration) -> Result<()> {
        self.shutdown(tokio::time::sleep(timeout)).await
    }

    async fn shutdown(&mut self, deadline: impl Future<Output = ()>) -> Result<()> {
        match self.state() {
            WorkerState::Starting | WorkerState::Running => {
                // The loop may have reached Stopping on its own in the meantime.
                if let Err(current) = self.state.transition(WorkerState::Stopping) {
                    if current != WorkerState::Stopping {
                        return Err(self.invalid(current, WorkerState::Stopping));
                    }
                }
            }
            WorkerState::Stopping => {}
            current => return Err(self.invalid(current, WorkerState::Stopping)),
        }
        debug!(worker = %self.name, "Worker stopping");

        self.hooks.fire_stopping();
        if let Some(token) = self.loop_cancel.take() {
            token.cancel();
        }
        self.hooks.fire_stop();

        if let Some(mut handle) = self.handle.take() {
            tokio::select! {
                biased;
                joined = &mut handle => {
                    if let Err(err) = joined {
                        warn!(worker = %self.name, "Work loop ended abnormally: {}", err);
                    }
                }
                _ = deadline => {
                    warn!(worker = %self.name, "Work loop did not stop in time, aborting");
                    handle.abort();
                }
            }
        }

        self.hooks.fire_stopped();
        self.advance(WorkerState::Stopped)?;
        debug!(worker = %self.name, "Worker stopped");
        Ok(())
    }

    fn advance(&self, next: WorkerState) -> Result<()> {
        self.state
            .transition(next)
            .map(|_| ())
            .map_err(|current| self.invalid(current, next))
    }

    fn invalid(&self, from: WorkerState, to: WorkerState) -> WorkerError {
        warn!(worker = %self.name, "Rejected lifecycle transition {} -> {}", from, to);
        WorkerError::InvalidTransition { from, to }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Some(token) = &self.loop_cancel {
            token.cancel();
        }
    }
}

async fn run_loop(
    name: String,
    work: WorkUnit,
    settings: WorkerSettings,
    state: Arc<StateCell>,
    cancel: CancellationToken,
) {
    match notify_forever(&work, settings, &cancel).await {
        Ok(never) => match never {},
        Err(WorkerError::Cancelled) => {
            info!(worker = %name, "Task was canceled gracefully...");
        }
        Err(err) => {
            warn!(worker = %name, "Work loop failed: {}", err);
        }
    }
    // Already Stopping when stop() got there first.
    let _ = state.transition(WorkerState::Stopping);
}

async fn notify_forever(
    work: &WorkUnit,
    settings: WorkerSettings,
    cancel: &CancellationToken,
) -> Result<Infallible> {
    let batch_size = settings.batch_size.max(1);
    loop {
        for counter in 1..=batch_size {
            if cancel.is_cancelled() {
                return Err(WorkerError::Cancelled);
            }
            work(counter);
            delay(settings.interval, cancel).await?;
        }
    }
}
