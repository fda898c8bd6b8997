//! The polling contract shared by every monitored aspect.

use std::time::Duration;

use async_trait::async_trait;
use hdwatch_types::DiagnosticStatus;

/// Message used whenever an aspect has nothing to report.
pub const NO_DATA: &str = "No Data";

/// One monitored facet of the host, polled on its own period.
///
/// `sample` never fails: source errors are rendered into the returned
/// status (level `Error` plus a marker detail), so a poll cycle always
/// produces a complete record.
#[async_trait]
pub trait Aspect: Send + Sync + 'static {
    /// Status name, e.g. "robot1 HD Temperature".
    fn name(&self) -> &str;

    /// Delay between the end of one poll and the start of the next.
    fn period(&self) -> Duration;

    /// Run one poll cycle: fetch, classify and build a fresh status.
    async fn sample(&self) -> DiagnosticStatus;
}
