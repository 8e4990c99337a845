//! Notification service variants
//!
//! The three services differ in their log prefix, in which lifecycle hooks
//! they install and in whether they run the notification loop, so each one
//! is a configuration of the single [`Worker`] type.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::hooks::{delay, LifecycleHooks};
use super::periodic::{Worker, WorkerSettings};
use crate::config::Config;
use crate::error::ConfigError;

/// One of the interchangeable notification services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerVariant {
    /// Plain background service: the work loop only
    Background,
    /// Hosted service: the work loop plus a stop hook
    Hosted,
    /// Hosted lifecycle service: delaying start hooks and all stop hooks, no loop
    HostedLifecycle,
}

impl WorkerVariant {
    pub const ALL: [WorkerVariant; 3] = [
        WorkerVariant::Background,
        WorkerVariant::Hosted,
        WorkerVariant::HostedLifecycle,
    ];

    /// Service type identifier reported by the HTTP endpoint.
    pub fn type_name(self) -> &'static str {
        match self {
            WorkerVariant::Background => "NotifyBackgroundService",
            WorkerVariant::Hosted => "NotifyHostedService",
            WorkerVariant::HostedLifecycle => "NotifyHostedLifeCycleService",
        }
    }

    /// Prefix used in every log line the variant emits.
    pub fn log_prefix(self) -> &'static str {
        match self {
            WorkerVariant::Background => "Background Service",
            WorkerVariant::Hosted => "Hosted Service",
            WorkerVariant::HostedLifecycle => "Hosted Lifecycle Service",
        }
    }

    /// Picks one of the three variants uniformly at random.
    pub fn random() -> Self {
        Self::ALL[rand::thread_rng().gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for WorkerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// How the variant is chosen at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSelection {
    Fixed(WorkerVariant),
    Random,
}

impl VariantSelection {
    pub fn resolve(self) -> WorkerVariant {
        match self {
            VariantSelection::Fixed(variant) => variant,
            VariantSelection::Random => WorkerVariant::random(),
        }
    }
}

impl FromStr for VariantSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "background" => Ok(VariantSelection::Fixed(WorkerVariant::Background)),
            "hosted" => Ok(VariantSelection::Fixed(WorkerVariant::Hosted)),
            "lifecycle" | "hosted_lifecycle" => {
                Ok(VariantSelection::Fixed(WorkerVariant::HostedLifecycle))
            }
            "random" => Ok(VariantSelection::Random),
            _ => Err(ConfigError::InvalidVariant(s.to_string())),
        }
    }
}

/// Builds the worker for `variant` using the timings from `config`.
pub fn build_worker(variant: WorkerVariant, config: &Config) -> Worker {
    let prefix = variant.log_prefix();
    let settings = WorkerSettings {
        interval: config.notify_interval(),
        batch_size: config.notify_batch_size,
    };

    let notify = move |number: u32| info!("{}: Notifying user {}", prefix, number);

    let worker = match variant {
        WorkerVariant::Background => Worker::new(variant.type_name(), notify),
        WorkerVariant::Hosted => Worker::new(variant.type_name(), notify).with_hooks(
            LifecycleHooks::new().on_stop(move || info!("{}: stopping service...", prefix)),
        ),
        WorkerVariant::HostedLifecycle => Worker::idle(variant.type_name())
            .with_hooks(lifecycle_hooks(prefix, config.hook_delay())),
    };

    worker.with_settings(settings)
}

fn lifecycle_hooks(prefix: &'static str, hook_delay: Duration) -> LifecycleHooks {
    let delaying = move |phase: &'static str| {
        move |cancel: CancellationToken| async move {
            info!("{}: {} Async...", prefix, phase);
            delay(hook_delay, &cancel).await
        }
    };

    LifecycleHooks::new()
        .on_starting(delaying("Starting"))
        .on_start(delaying("Start"))
        .on_started(delaying("Started"))
        .on_stopping(move || info!("{}: Stopping Async...", prefix))
        .on_stop(move || info!("{}: Stop Async...", prefix))
        .on_stopped(move || info!("{}: Stopped Async...", prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use crate::worker::WorkerState;
    use tokio::time::sleep;

    const GRACEFUL: &str = "Task was canceled gracefully...";

    fn fast_config() -> Config {
        Config {
            notify_interval_ms: 1000,
            hook_delay_ms: 2000,
            ..Config::default()
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(WorkerVariant::Background.type_name(), "NotifyBackgroundService");
        assert_eq!(WorkerVariant::Hosted.type_name(), "NotifyHostedService");
        assert_eq!(
            WorkerVariant::HostedLifecycle.to_string(),
            "NotifyHostedLifeCycleService"
        );
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!(
            "background".parse::<VariantSelection>().unwrap(),
            VariantSelection::Fixed(WorkerVariant::Background)
        );
        assert_eq!(
            " Hosted ".parse::<VariantSelection>().unwrap(),
            VariantSelection::Fixed(WorkerVariant::Hosted)
        );
        assert_eq!(
            "RANDOM".parse::<VariantSelection>().unwrap(),
            VariantSelection::Random
        );
        assert!("".parse::<VariantSelection>().is_err());
    }

    #[test]
    fn test_random_selection_stays_in_range() {
        for _ in 0..50 {
            let variant = VariantSelection::Random.resolve();
            assert!(WorkerVariant::ALL.contains(&variant));
        }
    }

    #[test]
    fn test_build_worker_uses_config() {
        let worker = build_worker(WorkerVariant::Hosted, &fast_config());
        assert_eq!(worker.name(), "NotifyHostedService");
        assert_eq!(worker.settings().interval, Duration::from_secs(1));
        assert_eq!(worker.settings().batch_size, 5);
        assert_eq!(worker.state(), WorkerState::NotStarted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_variant_delays_each_start_hook() {
        let mut worker = build_worker(WorkerVariant::HostedLifecycle, &fast_config());

        let started = tokio::time::Instant::now();
        worker.start(CancellationToken::new()).await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(6) && elapsed < Duration::from_secs(7));
        assert_eq!(worker.state(), WorkerState::Running);
        worker.stop(CancellationToken::new()).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_variant_starts_immediately() {
        let mut worker = build_worker(WorkerVariant::Background, &fast_config());

        let started = tokio::time::Instant::now();
        worker.start(CancellationToken::new()).await.unwrap();

        assert_eq!(started.elapsed(), Duration::ZERO);
        worker.stop(CancellationToken::new()).await.unwrap();
        assert_eq!(worker.state(), WorkerState::Stopped);
    }

    #[test]
    fn test_only_lifecycle_variant_is_idle() {
        let config = fast_config();
        assert!(build_worker(WorkerVariant::Background, &config).has_work());
        assert!(build_worker(WorkerVariant::Hosted, &config).has_work());
        assert!(!build_worker(WorkerVariant::HostedLifecycle, &config).has_work());
    }

    // == Log Output ==

    #[tokio::test(start_paused = true)]
    async fn test_background_variant_log_lines() {
        let (buffer, _guard) = capture_logs();
        let mut worker = build_worker(WorkerVariant::Background, &fast_config());

        worker.start(CancellationToken::new()).await.unwrap();
        sleep(Duration::from_millis(2500)).await;
        worker.stop(CancellationToken::new()).await.unwrap();

        assert_eq!(
            buffer.lines_starting_with("Background Service"),
            vec![
                "Background Service: Notifying user 1",
                "Background Service: Notifying user 2",
                "Background Service: Notifying user 3",
            ]
        );
        assert_eq!(buffer.count(GRACEFUL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hosted_variant_log_lines() {
        let (buffer, _guard) = capture_logs();
        let mut worker = build_worker(WorkerVariant::Hosted, &fast_config());

        worker.start(CancellationToken::new()).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        worker.stop(CancellationToken::new()).await.unwrap();

        assert_eq!(
            buffer.lines_starting_with("Hosted Service"),
            vec![
                "Hosted Service: Notifying user 1",
                "Hosted Service: Notifying user 2",
                "Hosted Service: stopping service...",
            ]
        );
        assert_eq!(buffer.count(GRACEFUL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_variant_log_lines() {
        let (buffer, _guard) = capture_logs();
        let mut worker = build_worker(WorkerVariant::HostedLifecycle, &fast_config());

        worker.start(CancellationToken::new()).await.unwrap();
        sleep(Duration::from_millis(2500)).await;
        worker.stop(CancellationToken::new()).await.unwrap();

        assert_eq!(
            buffer.lines_starting_with("Hosted Lifecycle Service"),
            vec![
                "Hosted Lifecycle Service: Starting Async...",
                "Hosted Lifecycle Service: Start Async...",
                "Hosted Lifecycle Service: Started Async...",
                "Hosted Lifecycle Service: Stopping Async...",
                "Hosted Lifecycle Service: Stop Async...",
                "Hosted Lifecycle Service: Stopped Async...",
            ]
        );
        assert_eq!(buffer.count("Notifying user"), 0);
        assert_eq!(buffer.count(GRACEFUL), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_variant_cancelled_while_starting() {
        let (buffer, _guard) = capture_logs();
        let mut worker = build_worker(WorkerVariant::HostedLifecycle, &fast_config());

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(3000)).await;
            trigger.cancel();
        });

        worker.start(cancel).await.unwrap();
        worker.stop(CancellationToken::new()).await.unwrap();

        assert_eq!(
            buffer.lines_starting_with("Hosted Lifecycle Service"),
            vec![
                "Hosted Lifecycle Service: Starting Async...",
                "Hosted Lifecycle Service: Start Async...",
                "Hosted Lifecycle Service: Stopping Async...",
                "Hosted Lifecycle Service: Stop Async...",
                "Hosted Lifecycle Service: Stopped Async...",
            ]
        );
        assert_eq!(buffer.count(GRACEFUL), 1);
    }
}
