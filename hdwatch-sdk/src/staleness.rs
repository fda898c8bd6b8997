//! Staleness overlay applied at publish time.
//!
//! A record that has not been refreshed within its lagging or stale window
//! is escalated to at least `Warning` or `Error`. The overlay is computed on
//! a copy; the stored record is never modified.

use std::time::Duration;

use hdwatch_types::{Detail, DetailValue, DiagnosticStatus, Level};
use tokio::time::Instant;

use crate::state::StatusRecord;

pub const UPDATE_STATUS_LABEL: &str = "Update Status";
pub const TIME_SINCE_UPDATE_LABEL: &str = "Time Since Update";

/// Reported age, in seconds, of a record that was never updated.
pub const NEVER_UPDATED_SECS: f64 = 100_000.0;

/// Freshness of a record relative to its last successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Staleness {
    Ok,
    Lagging,
    Stale,
}

impl Staleness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Staleness::Ok => "OK",
            Staleness::Lagging => "Lagging",
            Staleness::Stale => "Stale",
        }
    }

    /// Lowest level a record with this freshness may be published at.
    pub fn floor(&self) -> Level {
        match self {
            Staleness::Ok => Level::Ok,
            Staleness::Lagging => Level::Warning,
            Staleness::Stale => Level::Error,
        }
    }
}

/// Age windows after which a record is lagging or stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    pub lagging_after: Duration,
    pub stale_after: Duration,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            lagging_after: Duration::from_secs(20),
            stale_after: Duration::from_secs(35),
        }
    }
}

impl StalenessPolicy {
    /// Classify an age; `None` means the record was never updated.
    pub fn evaluate(&self, age: Option<Duration>) -> Staleness {
        match age {
            None => Staleness::Stale,
            Some(age) if age > self.stale_after => Staleness::Stale,
            Some(age) if age > self.lagging_after => Staleness::Lagging,
            Some(_) => Staleness::Ok,
        }
    }
}

/// Derive the publishable view of a record at time `now`.
///
/// The result leads with an "Update Status" text entry and a
/// "Time Since Update" numeric entry (seconds). Entries with those labels
/// already present are replaced, so overlaying a view again yields the
/// same view.
pub fn overlay(record: &StatusRecord, now: Instant, policy: &StalenessPolicy) -> DiagnosticStatus {
    let age = record
        .last_update
        .map(|at| now.saturating_duration_since(at));
    let staleness = policy.evaluate(age);

    let mut status = record.status.clone();
    status.level = status.level.max(staleness.floor());

    let age_secs = age.map_or(NEVER_UPDATED_SECS, |a| a.as_secs_f64());
    let mut details = Vec::with_capacity(status.details.len() + 2);
    details.push(Detail::new(UPDATE_STATUS_LABEL, staleness.as_str()));
    details.push(Detail::new(TIME_SINCE_UPDATE_LABEL, DetailValue::Number(age_secs)));
    details.extend(
        status
            .details
            .into_iter()
            .filter(|d| d.label != UPDATE_STATUS_LABEL && d.label != TIME_SINCE_UPDATE_LABEL),
    );
    status.details = details;

    status
}
