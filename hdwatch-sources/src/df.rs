//! Filesystem capacity reader backed by `df`.
//!
//! Runs `df -P --block-size=1G <path>` and parses the POSIX table:
//!
//! ```text
//! Filesystem     1G-blocks  Used Available Capacity Mounted on
//! /dev/sda1           458   301       134      70% /home
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Source, SourceError};

/// Filesystems smaller than this many GB are treated as pseudo-filesystems.
const MIN_SIZE_GB: u64 = 10;

/// Columns in a POSIX `df -P` row.
const POSIX_COLUMNS: usize = 6;

/// One row of `df` output.
#[derive(Debug, Clone, PartialEq)]
pub struct Filesystem {
    /// Device or filesystem name, e.g. `/dev/sda1`.
    pub name: String,
    pub size_gb: f64,
    pub available_gb: f64,
    pub mount_point: String,
}

/// Queries free space of the filesystem holding one directory.
#[derive(Debug, Clone)]
pub struct DfSource {
    path: PathBuf,
    program: String,
    timeout: Duration,
    description: String,
}

impl DfSource {
    /// Create a builder for the filesystem holding `path`.
    pub fn builder(path: impl Into<PathBuf>) -> DfSourceBuilder {
        DfSourceBuilder::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Source for DfSource {
    type Reading = Filesystem;

    async fn fetch(&self) -> Result<Vec<Filesystem>, SourceError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-P")
            .arg("--block-size=1G")
            .arg(&self.path)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // On timeout the child is dropped and therefore killed.
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| SourceError::Timeout(self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(SourceError::CommandFailed {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(parse_df(&String::from_utf8_lossy(&output.stdout)))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`DfSource`].
#[derive(Debug)]
pub struct DfSourceBuilder {
    path: PathBuf,
    program: Option<String>,
    timeout: Option<Duration>,
}

impl DfSourceBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            program: None,
            timeout: None,
        }
    }

    /// Override the usage tool (default: "df").
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Set the command timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> DfSource {
        let program = self.program.unwrap_or_else(|| "df".to_string());
        let description = format!("{} {}", program, self.path.display());

        DfSource {
            path: self.path,
            program,
            timeout: self.timeout.unwrap_or(Duration::from_secs(10)),
            description,
        }
    }
}

/// Parse `df -P --block-size=1G` output.
///
/// The header, blank lines, pseudo-filesystems under 10 GB and malformed
/// rows are skipped.
pub fn parse_df(output: &str) -> Vec<Filesystem> {
    let mut filesystems = Vec::new();

    for line in output.lines() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 2 {
            continue;
        }

        // Size must be a plain integer; this also drops the "1G-blocks" header
        let size_gb = match cols[1].parse::<u64>() {
            Ok(size) if size >= MIN_SIZE_GB => size,
            _ => continue,
        };

        if cols.len() < POSIX_COLUMNS {
            tracing::debug!(row = line, "Skipping truncated df row");
            continue;
        }

        let available_gb = match cols[3].parse::<f64>() {
            Ok(available) => available,
            Err(_) => {
                tracing::debug!(row = line, "Skipping df row with non-numeric availability");
                continue;
            }
        };

        filesystems.push(Filesystem {
            name: cols[0].to_string(),
            size_gb: size_gb as f64,
            available_gb,
            mount_point: cols[POSIX_COLUMNS - 1..].join(" "),
        });
    }

    filesystems
}
