//! # hdwatch-sdk
//!
//! Staleness-aware periodic aggregation of disk health diagnostics.
//!
//! Each monitored [`Aspect`] is polled by its own task on its own period and
//! writes a complete [`StatusRecord`] into shared state. A separate publish
//! task reads every record under one lock, escalates records that have not
//! been refreshed recently ("Lagging" / "Stale"), and emits the bundle to the
//! configured outputs at a bounded rate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hdwatch_sdk::{Bands, DfSource, HddtempSource, Monitor, Output, TemperatureAspect, UsageAspect};
//!
//! #[tokio::main]
//! async fn main() {
//!     let monitor = Monitor::builder()
//!         .aspect(TemperatureAspect::new(
//!             "robot1",
//!             HddtempSource::builder().build(),
//!             Bands::new(50.0, 55.0),
//!         ))
//!         .aspect(UsageAspect::new(
//!             "robot1",
//!             DfSource::builder("/home").build(),
//!             Bands::new(5.0, 1.0),
//!         ))
//!         .output(Output::Stdout)
//!         .build();
//!
//!     // Poll and publish in the background until the handle is dropped
//!     let handle = monitor.start();
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     handle.shutdown().await;
//! }
//! ```
//!
//! ## Guarantees
//!
//! - A slow or hung poller never delays publication; its record just ages
//!   into "Lagging" (at least `Warning`) and then "Stale" (`Error`).
//! - Published messages are consistent snapshots: no record is ever seen
//!   half-written.
//! - Publications are spaced by more than the minimum gap, whatever the
//!   publish interval.

mod aspect;
mod classify;
mod monitor;
mod output;
mod publisher;
mod staleness;
mod state;
mod temperature;
mod usage;

pub use aspect::{Aspect, NO_DATA};
pub use classify::{aggregate, aggregate_or_error, classify, Bands, Direction, Thresholds};
pub use monitor::{Monitor, MonitorBuilder, MonitorHandle, DEFAULT_PUBLISH_INTERVAL};
pub use output::{Output, TCP_SEND_TIMEOUT};
pub use publisher::{PublishThrottle, Publisher, DEFAULT_MIN_PUBLISH_GAP};
pub use staleness::{
    overlay, Staleness, StalenessPolicy, NEVER_UPDATED_SECS, TIME_SINCE_UPDATE_LABEL,
    UPDATE_STATUS_LABEL,
};
pub use state::{SharedState, Slot, StatusRecord};
pub use temperature::{TemperatureAspect, TEMPERATURE_PERIOD};
pub use usage::{UsageAspect, USAGE_PERIOD};

// Re-export types for convenience
pub use hdwatch_sources::{DfSource, DriveTemperature, Filesystem, HddtempSource, Source, SourceError};
pub use hdwatch_types::{Detail, DetailValue, DiagnosticArray, DiagnosticStatus, Level};
