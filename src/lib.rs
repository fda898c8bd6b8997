//! # hdwatch
//!
//! A disk health agent: polls drive temperatures from the hddtemp daemon
//! and free space from `df`, classifies both against threshold bands, and
//! publishes a staleness-aware diagnostics message at a bounded rate.
//!
//! ## Usage
//!
//! ```bash
//! # Temperatures only, JSON lines on stdout
//! hdwatch
//!
//! # Also watch free space on /home, publish to a TCP collector
//! hdwatch /home --connect diag-collector:9090
//!
//! # Layered configuration
//! HDWATCH_HDDTEMP__PORT=7635 hdwatch --config /etc/hdwatch.toml
//! ```
//!
//! ## As a library
//!
//! ```no_run
//! use hdwatch::{build_monitor, AgentConfig};
//!
//! # tokio_test::block_on(async {
//! let config = AgentConfig::load(None)?;
//! let handle = build_monitor(&config)?.start();
//! // ... run until done ...
//! handle.shutdown().await;
//! # Ok::<_, anyhow::Error>(())
//! # });
//! ```

pub mod config;
pub mod duration;

use std::time::Duration;

use anyhow::Result;
use hdwatch_sdk::{DfSource, HddtempSource, Monitor, Output, TemperatureAspect, UsageAspect};

pub use config::AgentConfig;

/// Build the outputs named by the configuration; stdout when none is.
pub fn build_outputs(config: &AgentConfig) -> Vec<Output> {
    let mut outputs = Vec::new();
    if let Some(path) = &config.output.file {
        outputs.push(Output::file(path));
    }
    if let Some(addr) = &config.output.connect {
        outputs.push(Output::tcp(addr));
    }
    if outputs.is_empty() {
        outputs.push(Output::Stdout);
    }
    outputs
}

/// Build the monitor for a validated configuration.
///
/// The temperature aspect is always present; the usage aspect only when a
/// home directory is configured.
pub fn build_monitor(config: &AgentConfig) -> Result<Monitor> {
    let hostname = config.resolved_hostname();

    let hddtemp = HddtempSource::builder()
        .host(config.hddtemp.host.as_str())
        .port(config.hddtemp.port)
        .timeout(Duration::from_secs(config.hddtemp.timeout_secs))
        .build();

    let mut builder = Monitor::builder()
        .aspect(
            TemperatureAspect::new(&hostname, hddtemp, config.thresholds.temperature)
                .suppress_warnings(config.no_temp_warn),
        )
        .publish_interval(config.publish.interval()?)
        .min_publish_gap(config.publish.min_gap()?);

    if let Some(home_dir) = &config.home_dir {
        let df = DfSource::builder(home_dir)
            .timeout(Duration::from_secs(config.df.timeout_secs))
            .build();
        builder = builder.aspect(UsageAspect::new(&hostname, df, config.thresholds.capacity));
    }

    for output in build_outputs(config) {
        builder = builder.output(output);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> AgentConfig {
        AgentConfig {
            hostname: Some("robot1".to_string()),
            ..AgentConfig::default()
        }
    }

    #[test]
    fn temperature_only_without_home_dir() {
        let monitor = build_monitor(&config()).unwrap();
        assert_eq!(monitor.aspect_count(), 1);

        let message = monitor.collect();
        assert_eq!(message.status[0].name, "robot1 HD Temperature");
    }

    #[test]
    fn home_dir_enables_usage() {
        let config = AgentConfig {
            home_dir: Some(PathBuf::from("/home")),
            ..config()
        };
        let monitor = build_monitor(&config).unwrap();
        assert_eq!(monitor.aspect_count(), 2);

        let message = monitor.collect();
        assert_eq!(message.status[1].name, "robot1 HD Usage");
    }

    #[test]
    fn stdout_is_the_default_output() {
        let outputs = build_outputs(&config());
        assert_eq!(outputs.len(), 1);
        assert!(matches!(outputs[0], Output::Stdout));
    }

    #[test]
    fn configured_outputs_replace_stdout() {
        let mut config = config();
        config.output.file = Some(PathBuf::from("diag.json"));
        config.output.connect = Some("localhost:9090".to_string());

        let outputs = build_outputs(&config);
        assert_eq!(outputs.len(), 2);
        assert!(matches!(outputs[0], Output::File(_)));
        assert!(matches!(outputs[1], Output::Tcp(_)));
    }

    #[test]
    fn bad_publish_interval_is_rejected() {
        let mut config = config();
        config.publish.interval = "often".to_string();
        assert!(build_monitor(&config).is_err());
    }
}
