//! Error types for sources.

use thiserror::Error;

/// Errors that can occur while sampling a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The telemetry daemon could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The source did not answer within its timeout.
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The external command ran but exited unsuccessfully.
    #[error("Command exited with status {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    /// Any other I/O fault (spawn failure, read error, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Returns true for a command that ran and reported failure.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, SourceError::CommandFailed { .. })
    }
}
