//! Drive temperature aspect.

use std::time::Duration;

use async_trait::async_trait;
use hdwatch_sources::{DriveTemperature, Source};
use hdwatch_types::{DiagnosticStatus, Level};

use crate::aspect::{Aspect, NO_DATA};
use crate::classify::{aggregate, classify, Bands, Direction};

/// Default poll period for drive temperatures.
pub const TEMPERATURE_PERIOD: Duration = Duration::from_secs(10);

/// Classifies drive temperatures reported by a source.
#[derive(Debug)]
pub struct TemperatureAspect<S> {
    source: S,
    name: String,
    bands: Bands,
    period: Duration,
    suppress_warnings: bool,
}

impl<S> TemperatureAspect<S>
where
    S: Source<Reading = DriveTemperature>,
{
    /// Create the aspect for `hostname`, named "<hostname> HD Temperature".
    pub fn new(hostname: &str, source: S, bands: Bands) -> Self {
        Self {
            source,
            name: format!("{} HD Temperature", hostname),
            bands,
            period: TEMPERATURE_PERIOD,
            suppress_warnings: false,
        }
    }

    /// Override the poll period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Report `Ok` whenever data is present, regardless of the readings.
    ///
    /// Useful on machines whose drives are known to run warm.
    pub fn suppress_warnings(mut self, suppress: bool) -> Self {
        self.suppress_warnings = suppress;
        self
    }

    /// Build the status for one batch of readings.
    pub fn status_for(&self, drives: &[DriveTemperature]) -> DiagnosticStatus {
        let mut builder = DiagnosticStatus::builder(&self.name);
        let mut levels = Vec::with_capacity(drives.len());

        for (index, drive) in drives.iter().enumerate() {
            let level = classify(drive.celsius, self.bands, Direction::HigherIsWorse);
            levels.push(level);

            builder = builder
                .text(format!("Disk {} Temp Status", index), level.temperature_text())
                .text(format!("Disk {} Mount Pt.", index), drive.device.as_str())
                .text(format!("Disk {} Device ID", index), drive.model.as_str())
                .number(format!("Disk {} Temp", index), drive.celsius);
        }

        match aggregate(levels) {
            Some(level) => {
                let reported = if self.suppress_warnings { Level::Ok } else { level };
                builder
                    .level(reported)
                    .message(level.temperature_text())
                    .build()
            }
            None => no_data(&self.name),
        }
    }
}

fn no_data(name: &str) -> DiagnosticStatus {
    DiagnosticStatus::builder(name)
        .level(Level::Error)
        .message(NO_DATA)
        .text("Disk Temp Data", "No hddtemp data")
        .build()
}

#[async_trait]
impl<S> Aspect for TemperatureAspect<S>
where
    S: Source<Reading = DriveTemperature> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn sample(&self) -> DiagnosticStatus {
        match self.source.fetch().await {
            Ok(drives) => self.status_for(&drives),
            Err(e) => {
                tracing::warn!(
                    source = self.source.description(),
                    error = %e,
                    "Temperature source unavailable",
                );
                no_data(&self.name)
            }
        }
    }
}
