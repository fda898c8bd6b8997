//! Severity levels.

use core::fmt;

/// Severity of a diagnostic status.
///
/// Levels are ordinal: a status made of several readings takes the
/// maximum of their levels, and staleness overlays only ever raise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    #[default]
    Ok = 0,
    Warning = 1,
    Error = 2,
}

impl Level {
    /// Numeric value of the level (0, 1 or 2).
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert a numeric level. Values above 2 saturate to `Error`.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Ok,
            1 => Level::Warning,
            _ => Level::Error,
        }
    }

    /// Generic status text: "OK", "Warning" or "Error".
    pub const fn status_text(self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warning => "Warning",
            Level::Error => "Error",
        }
    }

    /// Temperature flavoured text: "OK", "Warm" or "Hot".
    pub const fn temperature_text(self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warning => "Warm",
            Level::Error => "Hot",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_text())
    }
}
