//! DiagnosticArray - the aggregate message delivered to the sink.

use crate::{DiagnosticStatus, Level, SCHEMA_VERSION};

/// A point-in-time bundle of every aspect's status.
///
/// Built fresh on every publish; statuses appear in registration order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticArray {
    /// Schema version, [`SCHEMA_VERSION`] when built by this crate.
    pub version: u32,

    /// Unix timestamp in milliseconds when this message was assembled.
    pub timestamp_ms: u64,

    /// One status per monitored aspect.
    pub status: Vec<DiagnosticStatus>,
}

impl DiagnosticArray {
    /// Create an empty message stamped with the current time.
    pub fn new() -> Self {
        Self::with_timestamp(current_timestamp_ms())
    }

    /// Create an empty message with a specific timestamp.
    pub fn with_timestamp(timestamp_ms: u64) -> Self {
        Self {
            version: SCHEMA_VERSION,
            timestamp_ms,
            status: Vec::new(),
        }
    }

    pub fn builder() -> DiagnosticArrayBuilder {
        DiagnosticArrayBuilder::new()
    }

    /// True when this message uses the schema this crate understands.
    pub fn is_compatible(&self) -> bool {
        self.version == SCHEMA_VERSION
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    pub fn len(&self) -> usize {
        self.status.len()
    }

    /// Look up a status by name.
    pub fn get(&self, name: &str) -> Option<&DiagnosticStatus> {
        self.status.iter().find(|s| s.name == name)
    }

    /// Highest level across all statuses (`Ok` when empty).
    pub fn worst_level(&self) -> Level {
        self.status
            .iter()
            .map(|s| s.level)
            .max()
            .unwrap_or(Level::Ok)
    }
}

impl Default for DiagnosticArray {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`DiagnosticArray`].
#[derive(Debug, Default)]
pub struct DiagnosticArrayBuilder {
    timestamp_ms: Option<u64>,
    status: Vec<DiagnosticStatus>,
}

impl DiagnosticArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Append a status.
    pub fn status(mut self, status: DiagnosticStatus) -> Self {
        self.status.push(status);
        self
    }

    pub fn build(self) -> DiagnosticArray {
        DiagnosticArray {
            version: SCHEMA_VERSION,
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            status: self.status,
        }
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_order_and_timestamp() {
        let message = DiagnosticArray::builder()
            .timestamp_ms(1703160000000)
            .status(DiagnosticStatus::new("a HD Temperature", Level::Ok, "OK"))
            .status(DiagnosticStatus::new("a HD Usage", Level::Warning, "Warning"))
            .build();

        assert_eq!(message.timestamp_ms, 1703160000000);
        assert_eq!(message.len(), 2);
        assert_eq!(message.status[0].name, "a HD Temperature");
        assert_eq!(message.status[1].name, "a HD Usage");
        assert!(message.is_compatible());
    }

    #[test]
    fn worst_level_is_max() {
        let message = DiagnosticArray::builder()
            .status(DiagnosticStatus::new("x", Level::Warning, "Warning"))
            .status(DiagnosticStatus::new("y", Level::Error, "Error"))
            .status(DiagnosticStatus::new("z", Level::Ok, "OK"))
            .build();
        assert_eq!(message.worst_level(), Level::Error);
        assert_eq!(message.get("z").map(|s| s.level), Some(Level::Ok));
    }

    #[test]
    fn other_schema_version_is_incompatible() {
        let mut message = DiagnosticArray::with_timestamp(0);
        assert_eq!(message.version, SCHEMA_VERSION);
        message.version = SCHEMA_VERSION + 1;
        assert!(!message.is_compatible());
    }

    #[test]
    fn empty_message_is_ok() {
        let message = DiagnosticArray::with_timestamp(0);
        assert!(message.is_empty());
        assert_eq!(message.worst_level(), Level::Ok);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let message = DiagnosticArray::builder()
            .timestamp_ms(1703160000000)
            .status(
                DiagnosticStatus::builder("h HD Temperature")
                    .level(Level::Error)
                    .message("Hot")
                    .text("Disk 0 Temp Status", "Hot")
                    .number("Disk 0 Temp", 60.0)
                    .build(),
            )
            .build();

        let json = serde_json::to_string(&message).unwrap();
        let parsed: DiagnosticArray = serde_json::from_str(&json).unwrap();

        assert_eq!(message, parsed);
    }
}
