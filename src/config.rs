//! Layered agent configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `HDWATCH_*` environment variables (`__` separates nested
//! keys, e.g. `HDWATCH_HDDTEMP__PORT=7635`). Command-line flags are applied
//! on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use hdwatch_sdk::{Direction, Thresholds};
use serde::Deserialize;

use crate::duration::parse_duration;

const ENV_PREFIX: &str = "HDWATCH";

/// Everything the agent needs to start.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Prefix of every status name; resolved from the system when unset.
    pub hostname: Option<String>,
    /// Directory whose filesystem is checked for free space. Usage
    /// monitoring is disabled when unset.
    pub home_dir: Option<PathBuf>,
    /// Never report temperature warnings while data is present.
    pub no_temp_warn: bool,
    pub hddtemp: HddtempConfig,
    pub df: DfConfig,
    pub thresholds: Thresholds,
    pub publish: PublishConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HddtempConfig {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for HddtempConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 7634,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DfConfig {
    pub timeout_secs: u64,
}

impl Default for DfConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Publish cadence, as duration strings ("1s", "500ms").
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub interval: String,
    pub min_gap: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            interval: "1s".to_string(),
            min_gap: "500ms".to_string(),
        }
    }
}

impl PublishConfig {
    pub fn interval(&self) -> Result<Duration> {
        parse_duration(&self.interval).context("Invalid publish.interval")
    }

    pub fn min_gap(&self) -> Result<Duration> {
        parse_duration(&self.min_gap).context("Invalid publish.min_gap")
    }
}

/// Where published messages go; stdout when neither is set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON file overwritten on every publish.
    pub file: Option<PathBuf>,
    /// TCP endpoint (host:port) receiving one JSON line per publish.
    pub connect: Option<String>,
}

impl AgentConfig {
    /// Load from an optional file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process one.
    pub fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: AgentConfig = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the agent cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.hddtemp.timeout_secs == 0 {
            anyhow::bail!("hddtemp.timeout_secs must be greater than zero");
        }
        if self.df.timeout_secs == 0 {
            anyhow::bail!("df.timeout_secs must be greater than zero");
        }
        if self.publish.interval()?.is_zero() {
            anyhow::bail!("publish.interval must be greater than zero");
        }
        self.publish.min_gap()?;

        let temperature = self.thresholds.temperature;
        if !temperature.is_ordered(Direction::HigherIsWorse) {
            anyhow::bail!(
                "thresholds.temperature: warn ({}) must not be above error ({})",
                temperature.warn,
                temperature.error
            );
        }
        let capacity = self.thresholds.capacity;
        if !capacity.is_ordered(Direction::LowerIsWorse) {
            anyhow::bail!(
                "thresholds.capacity: warn ({}) must not be below error ({})",
                capacity.warn,
                capacity.error
            );
        }
        Ok(())
    }

    /// The configured hostname, or the system's.
    pub fn resolved_hostname(&self) -> String {
        match &self.hostname {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => system_hostname(),
        }
    }
}

/// Hostname from `$HOSTNAME`, then `/etc/hostname`, else "localhost".
pub fn system_hostname() -> String {
    fn non_empty(name: String) -> Option<String> {
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    std::env::var("HOSTNAME")
        .ok()
        .and_then(non_empty)
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok().and_then(non_empty))
        .unwrap_or_else(|| "localhost".to_string())
}
