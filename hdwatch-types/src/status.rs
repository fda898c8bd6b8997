//! DiagnosticStatus - the classified state of one monitored aspect.

use crate::Level;

/// Value attached to a detail entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum DetailValue {
    Number(f64),
    Text(String),
}

impl DetailValue {
    /// Returns the text value, if this is a text entry.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DetailValue::Text(s) => Some(s),
            DetailValue::Number(_) => None,
        }
    }

    /// Returns the numeric value, if this is a numeric entry.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DetailValue::Number(n) => Some(*n),
            DetailValue::Text(_) => None,
        }
    }
}

impl From<&str> for DetailValue {
    fn from(s: &str) -> Self {
        DetailValue::Text(s.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(s: String) -> Self {
        DetailValue::Text(s)
    }
}

impl From<f64> for DetailValue {
    fn from(n: f64) -> Self {
        DetailValue::Number(n)
    }
}

/// A labelled key/value pair shown alongside a status.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detail {
    pub label: String,
    pub value: DetailValue,
}

impl Detail {
    pub fn new(label: impl Into<String>, value: impl Into<DetailValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The classified state of one monitored aspect (disk temperature, disk usage).
///
/// `details` is ordered and is replaced wholesale on every poll cycle.
///
/// # Example
///
/// ```rust
/// use hdwatch_types::{DiagnosticStatus, Level};
///
/// let status = DiagnosticStatus::builder("robot1 HD Usage")
///     .level(Level::Ok)
///     .message("OK")
///     .text("Disk Space Reading", "OK")
///     .number("Disk 1 Available", 120.0)
///     .build();
///
/// assert_eq!(status.text("Disk Space Reading"), Some("OK"));
/// assert_eq!(status.number("Disk 1 Available"), Some(120.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticStatus {
    /// Display name, e.g. "robot1 HD Temperature".
    pub name: String,

    /// Severity of the aspect.
    pub level: Level,

    /// Summary shown next to the name ("OK", "Warm", "No Data", ...).
    pub message: String,

    /// Ordered detail entries.
    #[cfg_attr(feature = "serde", serde(default))]
    pub details: Vec<Detail>,
}

impl DiagnosticStatus {
    /// Create a status with no details.
    pub fn new(name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Create a builder for a status with the given name.
    pub fn builder(name: impl Into<String>) -> DiagnosticStatusBuilder {
        DiagnosticStatusBuilder::new(name)
    }

    /// First detail entry with the given label.
    pub fn detail(&self, label: &str) -> Option<&DetailValue> {
        self.details
            .iter()
            .find(|d| d.label == label)
            .map(|d| &d.value)
    }

    /// Text value of the first detail with the given label.
    pub fn text(&self, label: &str) -> Option<&str> {
        self.detail(label).and_then(DetailValue::as_text)
    }

    /// Numeric value of the first detail with the given label.
    pub fn number(&self, label: &str) -> Option<f64> {
        self.detail(label).and_then(DetailValue::as_number)
    }
}

/// Builder for [`DiagnosticStatus`].
#[derive(Debug)]
pub struct DiagnosticStatusBuilder {
    status: DiagnosticStatus,
}

impl DiagnosticStatusBuilder {
    /// Create a new builder. Level defaults to `Ok` and message to empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            status: DiagnosticStatus::new(name, Level::Ok, ""),
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.status.level = level;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.status.message = message.into();
        self
    }

    /// Append a text detail.
    pub fn text(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.status
            .details
            .push(Detail::new(label, DetailValue::Text(value.into())));
        self
    }

    /// Append a numeric detail.
    pub fn number(mut self, label: impl Into<String>, value: f64) -> Self {
        self.status
            .details
            .push(Detail::new(label, DetailValue::Number(value)));
        self
    }

    /// Append a pre-built detail.
    pub fn detail(mut self, detail: Detail) -> Self {
        self.status.details.push(detail);
        self
    }

    pub fn build(self) -> DiagnosticStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_detail_order() {
        let status = DiagnosticStatus::builder("host HD Temperature")
            .level(Level::Error)
            .message("Hot")
            .text("Disk 0 Temp Status", "Hot")
            .text("Disk 0 Mount Pt.", "/dev/sda")
            .number("Disk 0 Temp", 60.0)
            .build();

        let labels: Vec<_> = status.details.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Disk 0 Temp Status", "Disk 0 Mount Pt.", "Disk 0 Temp"]
        );
        assert_eq!(status.level, Level::Error);
        assert_eq!(status.message, "Hot");
    }

    #[test]
    fn lookup_helpers_respect_value_kind() {
        let status = DiagnosticStatus::builder("s")
            .text("label", "value")
            .number("count", 3.0)
            .build();

        assert_eq!(status.text("label"), Some("value"));
        assert_eq!(status.number("label"), None);
        assert_eq!(status.number("count"), Some(3.0));
        assert_eq!(status.text("count"), None);
        assert!(status.detail("missing").is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn detail_values_serialize_untagged() {
        let status = DiagnosticStatus::builder("s")
            .text("a", "x")
            .number("b", 1.5)
            .build();
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["details"][0]["value"], "x");
        assert_eq!(json["details"][1]["value"], 1.5);
    }
}
