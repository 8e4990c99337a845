//! Lifecycle hooks and the cancellable delay they share with the work loop.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{Result, WorkerError};

/// Boxed future returned by a start hook.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

/// Async hook run while the worker starts. May delay via [`delay`].
pub type StartHook = Arc<dyn Fn(CancellationToken) -> HookFuture + Send + Sync>;

/// Synchronous hook run while the worker stops.
pub type StopHook = Arc<dyn Fn() + Send + Sync>;

/// Unit of periodic work, called with the 1-based counter.
pub type WorkUnit = Arc<dyn Fn(u32) + Send + Sync>;

/// Suspends for `duration`, or returns [`WorkerError::Cancelled`] as soon
/// as `cancel` fires. An already-cancelled token wins over a zero delay.
pub async fn delay(duration: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(WorkerError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Optional callbacks invoked at each lifecycle transition.
///
/// Missing hooks are skipped.
#[derive(Clone, Default)]
pub struct LifecycleHooks {
    pub starting: Option<StartHook>,
    pub start: Option<StartHook>,
    pub started: Option<StartHook>,
    pub stopping: Option<StopHook>,
    pub stop: Option<StopHook>,
    pub stopped: Option<StopHook>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_starting<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.starting = Some(boxed_start_hook(hook));
        self
    }

    pub fn on_start<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.start = Some(boxed_start_hook(hook));
        self
    }

    pub fn on_started<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.started = Some(boxed_start_hook(hook));
        self
    }

    pub fn on_stopping(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.stopping = Some(Arc::new(hook));
        self
    }

    pub fn on_stop(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.stop = Some(Arc::new(hook));
        self
    }

    pub fn on_stopped(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.stopped = Some(Arc::new(hook));
        self
    }

    /// Runs `starting`, `start`, `started` in order, awaiting each one.
    pub(crate) async fn run_start(&self, cancel: &CancellationToken) -> Result<()> {
        for hook in [&self.starting, &self.start, &self.started].into_iter().flatten() {
            hook(cancel.clone()).await?;
        }
        Ok(())
    }

    pub(crate) fn fire_stopping(&self) {
        fire(&self.stopping);
    }

    pub(crate) fn fire_stop(&self) {
        fire(&self.stop);
    }

    pub(crate) fn fire_stopped(&self) {
        fire(&self.stopped);
    }
}

fn fire(hook: &Option<StopHook>) {
    if let Some(hook) = hook {
        hook();
    }
}

fn boxed_start_hook<F, Fut>(hook: F) -> StartHook
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |cancel: CancellationToken| Box::pin(hook(cancel)) as HookFuture)
}
