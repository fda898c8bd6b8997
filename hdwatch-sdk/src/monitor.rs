//! The Monitor: per-aspect poll loops plus one throttled publish loop.

use std::sync::Arc;
use std::time::Duration;

use hdwatch_types::DiagnosticArray;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::aspect::Aspect;
use crate::output::Output;
use crate::publisher::{emit_all, PublishThrottle, Publisher, DEFAULT_MIN_PUBLISH_GAP};
use crate::staleness::StalenessPolicy;
use crate::state::{SharedState, Slot};

/// Default period of the publish loop.
pub const DEFAULT_PUBLISH_INTERVAL: Duration = Duration::from_secs(1);

/// Polls every registered aspect and periodically publishes the aggregate.
///
/// # Example
///
/// ```rust,no_run
/// use hdwatch_sdk::{Bands, HddtempSource, Monitor, Output, TemperatureAspect};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let monitor = Monitor::builder()
///         .aspect(TemperatureAspect::new(
///             "robot1",
///             HddtempSource::builder().build(),
///             Bands::new(50.0, 55.0),
///         ))
///         .output(Output::file("diagnostics.json"))
///         .publish_interval(Duration::from_secs(1))
///         .build();
///
///     let handle = monitor.start();
///
///     tokio::time::sleep(Duration::from_secs(30)).await;
///     handle.shutdown().await;
/// }
/// ```
pub struct Monitor {
    state: Arc<SharedState>,
    aspects: Vec<(Slot, Arc<dyn Aspect>)>,
    outputs: Arc<Vec<Output>>,
    publish_interval: Duration,
    min_publish_gap: Duration,
    staleness: StalenessPolicy,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("aspects", &self.aspects.iter().map(|(_, a)| a.name()).collect::<Vec<_>>())
            .field("outputs", &self.outputs)
            .field("publish_interval", &self.publish_interval)
            .field("min_publish_gap", &self.min_publish_gap)
            .field("staleness", &self.staleness)
            .finish()
    }
}

impl Monitor {
    /// Create a builder for configuring the monitor.
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// Collect the current aggregate message, with staleness applied.
    ///
    /// Useful for manual emission instead of the background publish loop.
    pub fn collect(&self) -> DiagnosticArray {
        self.state.collect(Instant::now(), &self.staleness)
    }

    /// Emit the current aggregate to all outputs immediately.
    ///
    /// Bypasses the publish throttle.
    pub async fn emit_now(&self) {
        let message = self.collect();
        emit_all(&self.outputs, &message).await;
    }

    /// Number of registered aspects.
    pub fn aspect_count(&self) -> usize {
        self.aspects.len()
    }

    /// Start polling every aspect and publishing in the background.
    ///
    /// Spawns one task per aspect plus the publish task. Each aspect is
    /// sampled right away; the first publication happens after one publish
    /// interval.
    ///
    /// Returns a handle that stops every task when told to or when dropped.
    pub fn start(&self) -> MonitorHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut tasks = Vec::with_capacity(self.aspects.len() + 1);

        for (slot, aspect) in &self.aspects {
            tasks.push(tokio::spawn(poll_loop(
                aspect.clone(),
                *slot,
                self.state.clone(),
                stop_rx.clone(),
            )));
        }

        tasks.push(tokio::spawn(publish_loop(
            self.state.clone(),
            self.outputs.clone(),
            self.publish_interval,
            PublishThrottle::new(self.min_publish_gap),
            self.staleness,
            stop_rx,
        )));

        tracing::info!(
            aspects = self.aspects.len(),
            outputs = self.outputs.len(),
            interval_ms = self.publish_interval.as_millis() as u64,
            "Monitor started",
        );

        MonitorHandle { stop_tx, tasks }
    }
}

/// Whether a stop was requested, given the result of `changed()`.
fn stop_requested(changed: Result<(), watch::error::RecvError>, rx: &watch::Receiver<bool>) -> bool {
    // A dropped sender means the handle is gone
    changed.is_err() || *rx.borrow()
}

async fn poll_loop(
    aspect: Arc<dyn Aspect>,
    slot: Slot,
    state: Arc<SharedState>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let period = aspect.period();

    loop {
        if *stop_rx.borrow() {
            break;
        }

        // Sampled off-lock; only the finished record is swapped in
        let status = aspect.sample().await;
        state.store(slot, status, Instant::now());
        tracing::debug!(aspect = aspect.name(), "Aspect sampled");

        tokio::select! {
            _ = tokio::time::sleep(period) => {}
            changed = stop_rx.changed() => {
                if stop_requested(changed, &stop_rx) {
                    break;
                }
            }
        }
    }

    tracing::debug!(aspect = aspect.name(), "Poll loop stopped");
}

async fn publish_loop(
    state: Arc<SharedState>,
    outputs: Arc<Vec<Output>>,
    interval: Duration,
    throttle: PublishThrottle,
    staleness: StalenessPolicy,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut publisher = Publisher::new(&outputs, throttle);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                // Lock is held only inside collect; emission runs unlocked
                let message = state.collect(now, &staleness);
                publisher.publish(&message, now).await;
            }
            changed = stop_rx.changed() => {
                if stop_requested(changed, &stop_rx) {
                    break;
                }
            }
        }
    }

    tracing::debug!("Publish loop stopped");
}

/// Builder for configuring a Monitor.
#[derive(Default)]
pub struct MonitorBuilder {
    aspects: Vec<Arc<dyn Aspect>>,
    outputs: Vec<Output>,
    publish_interval: Option<Duration>,
    min_publish_gap: Option<Duration>,
    staleness: Option<StalenessPolicy>,
}

impl MonitorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an aspect to poll.
    ///
    /// Statuses appear in the published message in the order aspects are
    /// added.
    pub fn aspect(mut self, aspect: impl Aspect) -> Self {
        self.aspects.push(Arc::new(aspect));
        self
    }

    /// Add an output destination.
    ///
    /// Multiple outputs can be added; messages are emitted to all of them.
    pub fn output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    /// Set the publish loop period.
    ///
    /// Defaults to 1 second if not specified. A zero period is replaced by
    /// the default when the monitor is built.
    pub fn publish_interval(mut self, interval: Duration) -> Self {
        self.publish_interval = Some(interval);
        self
    }

    /// Set the minimum spacing between two publications.
    ///
    /// Defaults to 500 ms if not specified.
    pub fn min_publish_gap(mut self, gap: Duration) -> Self {
        self.min_publish_gap = Some(gap);
        self
    }

    /// Set the lagging/stale windows.
    pub fn staleness(mut self, policy: StalenessPolicy) -> Self {
        self.staleness = Some(policy);
        self
    }

    /// Build the monitor, registering one record per aspect.
    pub fn build(self) -> Monitor {
        let state = Arc::new(SharedState::default());
        let aspects = self
            .aspects
            .into_iter()
            .map(|aspect| (state.register(aspect.name()), aspect))
            .collect();

        let publish_interval = match self.publish_interval {
            Some(interval) if interval.is_zero() => {
                tracing::warn!(
                    default_ms = DEFAULT_PUBLISH_INTERVAL.as_millis() as u64,
                    "Zero publish interval, using the default",
                );
                DEFAULT_PUBLISH_INTERVAL
            }
            Some(interval) => interval,
            None => DEFAULT_PUBLISH_INTERVAL,
        };

        Monitor {
            state,
            aspects,
            outputs: Arc::new(self.outputs),
            publish_interval,
            min_publish_gap: self.min_publish_gap.unwrap_or(DEFAULT_MIN_PUBLISH_GAP),
            staleness: self.staleness.unwrap_or_default(),
        }
    }
}

/// Handle for controlling the background tasks.
///
/// Drop this handle to stop every loop, or call `stop()` / `shutdown()`
/// explicitly. A sample already in flight runs to completion.
#[derive(Debug)]
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signal every loop to stop without waiting for them.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }

    /// Signal every loop to stop and wait until they have exited.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Monitor task ended abnormally");
            }
        }
        tracing::info!("Monitor stopped");
    }
}
