//! Rate-limited delivery of collected messages to every output.

use std::time::Duration;

use hdwatch_types::DiagnosticArray;
use tokio::time::Instant;

use crate::output::Output;

/// Default minimum spacing between two publications.
pub const DEFAULT_MIN_PUBLISH_GAP: Duration = Duration::from_millis(500);

/// Gate that lets a publication through at most once per `min_gap`.
#[derive(Debug, Clone)]
pub struct PublishThrottle {
    min_gap: Duration,
    last: Option<Instant>,
}

impl PublishThrottle {
    pub fn new(min_gap: Duration) -> Self {
        Self { min_gap, last: None }
    }

    pub fn min_gap(&self) -> Duration {
        self.min_gap
    }

    /// Whether a publication may happen at `now`.
    ///
    /// True when nothing was published yet or strictly more than `min_gap`
    /// has passed since the last one; a `true` answer records `now` as the
    /// last publication.
    pub fn ready(&mut self, now: Instant) -> bool {
        let ready = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.min_gap,
        };
        if ready {
            self.last = Some(now);
        }
        ready
    }
}

impl Default for PublishThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PUBLISH_GAP)
    }
}

/// Sends messages to all outputs, subject to a [`PublishThrottle`].
#[derive(Debug)]
pub struct Publisher<'a> {
    outputs: &'a [Output],
    throttle: PublishThrottle,
}

impl<'a> Publisher<'a> {
    pub fn new(outputs: &'a [Output], throttle: PublishThrottle) -> Self {
        Self { outputs, throttle }
    }

    /// Publish `message` if the throttle allows it at `now`.
    ///
    /// Returns whether the message went out. Output failures are logged and
    /// otherwise ignored; the next publication simply tries again.
    pub async fn publish(&mut self, message: &DiagnosticArray, now: Instant) -> bool {
        if !self.throttle.ready(now) {
            tracing::trace!("Publication suppressed by throttle");
            return false;
        }
        emit_all(self.outputs, message).await;
        true
    }
}

/// Emit `message` to every output, logging failures.
pub(crate) async fn emit_all(outputs: &[Output], message: &DiagnosticArray) {
    for output in outputs {
        if let Err(e) = output.emit(message).await {
            tracing::warn!(output = %output.describe(), error = %e, "Failed to publish diagnostics");
        }
    }
}
