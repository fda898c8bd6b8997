//! # hdwatch-sources
//!
//! Readers that sample disk telemetry for the hdwatch agent.
//!
//! ## Supported Sources
//!
//! - **hddtemp** ([`HddtempSource`]) - drive temperatures from the hddtemp
//!   daemon's TCP endpoint (default `localhost:7634`)
//! - **df** ([`DfSource`]) - free space per filesystem from
//!   `df -P --block-size=1G <path>`
//!
//! Every source reports failures as a [`SourceError`] instead of panicking,
//! so a broken daemon or a missing binary only degrades one poll cycle.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hdwatch_sources::{HddtempSource, Source};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HddtempSource::builder()
//!         .host("localhost")
//!         .port(7634)
//!         .build();
//!
//!     for drive in source.fetch().await? {
//!         println!("{} ({}) {} C", drive.device, drive.model, drive.celsius);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

pub mod df;
pub mod error;
pub mod hddtemp;

pub use df::{parse_df, DfSource, DfSourceBuilder, Filesystem};
pub use error::SourceError;
pub use hddtemp::{parse_hddtemp, DriveTemperature, HddtempSource, HddtempSourceBuilder};

/// A fallible reader producing one batch of readings per call.
///
/// Implementations must bound how long `fetch` can take.
#[async_trait]
pub trait Source: Send + Sync {
    /// One item of the batch, e.g. a drive temperature.
    type Reading: Send;

    /// Sample the source once.
    async fn fetch(&self) -> Result<Vec<Self::Reading>, SourceError>;

    /// Human-readable description, used in logs.
    fn description(&self) -> &str;
}
