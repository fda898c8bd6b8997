//! Disk usage aspect.

use std::time::Duration;

use async_trait::async_trait;
use hdwatch_sources::{Filesystem, Source, SourceError};
use hdwatch_types::{DiagnosticStatus, Level};

use crate::aspect::{Aspect, NO_DATA};
use crate::classify::{aggregate, classify, Bands, Direction};

/// Default poll period for disk usage.
pub const USAGE_PERIOD: Duration = Duration::from_secs(5);

const READING_LABEL: &str = "Disk Space Reading";

/// Classifies available space of the filesystems reported by a source.
#[derive(Debug)]
pub struct UsageAspect<S> {
    source: S,
    name: String,
    bands: Bands,
    period: Duration,
}

impl<S> UsageAspect<S>
where
    S: Source<Reading = Filesystem>,
{
    /// Create the aspect for `hostname`, named "<hostname> HD Usage".
    ///
    /// `bands.warn` is the low-space bound and `bands.error` the critical
    /// one, both in GB.
    pub fn new(hostname: &str, source: S, bands: Bands) -> Self {
        Self {
            source,
            name: format!("{} HD Usage", hostname),
            bands,
            period: USAGE_PERIOD,
        }
    }

    /// Override the poll period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Build the status for one successful batch of readings.
    pub fn status_for(&self, filesystems: &[Filesystem]) -> DiagnosticStatus {
        let mut builder = DiagnosticStatus::builder(&self.name).text(READING_LABEL, "OK");
        let mut levels = Vec::with_capacity(filesystems.len());

        for (row, fs) in filesystems.iter().enumerate() {
            let n = row + 1;
            let level = classify(fs.available_gb, self.bands, Direction::LowerIsWorse);
            levels.push(level);

            builder = builder
                .text(format!("Disk {} Name", n), fs.name.as_str())
                .number(format!("Disk {} Available", n), fs.available_gb)
                .number(format!("Disk {} Size", n), fs.size_gb)
                .text(format!("Disk {} Status", n), level.status_text())
                .text(format!("Disk {} Mount Point", n), fs.mount_point.as_str());
        }

        match aggregate(levels) {
            Some(level) => builder.level(level).message(level.status_text()).build(),
            None => builder.level(Level::Error).message(NO_DATA).build(),
        }
    }

    /// Build the status for a failed poll.
    pub fn status_for_error(&self, error: &SourceError) -> DiagnosticStatus {
        let builder = DiagnosticStatus::builder(&self.name).level(Level::Error);

        if error.is_command_failure() {
            builder
                .message("Failed")
                .text(READING_LABEL, "Failed")
                .build()
        } else {
            builder
                .message("Exception")
                .text(READING_LABEL, "Exception")
                .text("Disk Space Ex", error.to_string())
                .build()
        }
    }
}

#[async_trait]
impl<S> Aspect for UsageAspect<S>
where
    S: Source<Reading = Filesystem> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn sample(&self) -> DiagnosticStatus {
        match self.source.fetch().await {
            Ok(filesystems) => self.status_for(&filesystems),
            Err(e) if e.is_command_failure() => {
                tracing::warn!(source = self.source.description(), error = %e, "Disk usage query failed");
                self.status_for_error(&e)
            }
            Err(e) => {
                tracing::error!(source = self.source.description(), error = %e, "Disk usage query raised an error");
                self.status_for_error(&e)
            }
        }
    }
}
