//! Threshold classification of raw readings.

use hdwatch_types::Level;
use serde::Deserialize;

/// Which side of the bands is bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Level rises when the value exceeds a bound (temperature).
    HigherIsWorse,
    /// Level rises when the value drops to or below a bound (free space).
    LowerIsWorse,
}

/// A warn/error pair of boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Bands {
    pub warn: f64,
    pub error: f64,
}

impl Bands {
    pub const fn new(warn: f64, error: f64) -> Self {
        Self { warn, error }
    }

    /// True when both bounds are finite and the warn bound is reached
    /// before the error bound in the given direction.
    pub fn is_ordered(&self, direction: Direction) -> bool {
        if !self.warn.is_finite() || !self.error.is_finite() {
            return false;
        }
        match direction {
            Direction::HigherIsWorse => self.warn <= self.error,
            Direction::LowerIsWorse => self.warn >= self.error,
        }
    }
}

/// Immutable thresholds for every metric, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Drive temperature in Celsius: warm above `warn`, hot above `error`.
    pub temperature: Bands,
    /// Available space in GB: low at or below `warn`, critical at or below `error`.
    pub capacity: Bands,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature: Bands::new(50.0, 55.0),
            capacity: Bands::new(5.0, 1.0),
        }
    }
}

/// Classify one reading against a pair of bands.
///
/// For [`Direction::HigherIsWorse`] the comparisons are strict
/// (`value > warn`); for [`Direction::LowerIsWorse`] they are inclusive
/// (`value <= warn`).
pub fn classify(value: f64, bands: Bands, direction: Direction) -> Level {
    match direction {
        Direction::HigherIsWorse => {
            if value > bands.error {
                Level::Error
            } else if value > bands.warn {
                Level::Warning
            } else {
                Level::Ok
            }
        }
        Direction::LowerIsWorse => {
            if value <= bands.error {
                Level::Error
            } else if value <= bands.warn {
                Level::Warning
            } else {
                Level::Ok
            }
        }
    }
}

/// Worst level of a batch, or `None` when the batch is empty (no data).
pub fn aggregate<I>(levels: I) -> Option<Level>
where
    I: IntoIterator<Item = Level>,
{
    levels.into_iter().max()
}

/// Like [`aggregate`], with an empty batch counted as `Error`.
pub fn aggregate_or_error<I>(levels: I) -> Level
where
    I: IntoIterator<Item = Level>,
{
    aggregate(levels).unwrap_or(Level::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMP: Bands = Bands::new(50.0, 55.0);
    const SPACE: Bands = Bands::new(5.0, 1.0);

    #[test]
    fn band_order_depends_on_direction() {
        assert!(TEMP.is_ordered(Direction::HigherIsWorse));
        assert!(!TEMP.is_ordered(Direction::LowerIsWorse));
        assert!(SPACE.is_ordered(Direction::LowerIsWorse));
        assert!(!SPACE.is_ordered(Direction::HigherIsWorse));
        // Collapsed bands skip straight to the error level, which is allowed
        assert!(Bands::new(50.0, 50.0).is_ordered(Direction::HigherIsWorse));
        assert!(!Bands::new(f64::NAN, 55.0).is_ordered(Direction::HigherIsWorse));
    }

    #[test]
    fn temperature_bands_are_strict() {
        assert_eq!(classify(50.0, TEMP, Direction::HigherIsWorse), Level::Ok);
        assert_eq!(classify(50.5, TEMP, Direction::HigherIsWorse), Level::Warning);
        assert_eq!(classify(55.0, TEMP, Direction::HigherIsWorse), Level::Warning);
        assert_eq!(classify(55.1, TEMP, Direction::HigherIsWorse), Level::Error);
        assert_eq!(classify(60.0, TEMP, Direction::HigherIsWorse), Level::Error);
    }

    #[test]
    fn temperature_sweep_matches_definition() {
        for tenth in 0..1000 {
            let t = tenth as f64 / 10.0;
            let expected = if t > 55.0 {
                Level::Error
            } else if t > 50.0 {
                Level::Warning
            } else {
                Level::Ok
            };
            assert_eq!(classify(t, TEMP, Direction::HigherIsWorse), expected, "t = {t}");
        }
    }

    #[test]
    fn capacity_bands_are_inclusive() {
        assert_eq!(classify(0.0, SPACE, Direction::LowerIsWorse), Level::Error);
        assert_eq!(classify(1.0, SPACE, Direction::LowerIsWorse), Level::Error);
        assert_eq!(classify(3.0, SPACE, Direction::LowerIsWorse), Level::Warning);
        assert_eq!(classify(5.0, SPACE, Direction::LowerIsWorse), Level::Warning);
        assert_eq!(classify(5.5, SPACE, Direction::LowerIsWorse), Level::Ok);
    }

    #[test]
    fn capacity_sweep_matches_definition() {
        for tenth in 0..200 {
            let g = tenth as f64 / 10.0;
            let expected = if g <= 1.0 {
                Level::Error
            } else if g <= 5.0 {
                Level::Warning
            } else {
                Level::Ok
            };
            assert_eq!(classify(g, SPACE, Direction::LowerIsWorse), expected, "g = {g}");
        }
    }

    #[test]
    fn aggregate_takes_max() {
        assert_eq!(
            aggregate([Level::Ok, Level::Error, Level::Warning]),
            Some(Level::Error)
        );
        assert_eq!(aggregate([Level::Ok, Level::Ok]), Some(Level::Ok));
    }

    #[test]
    fn empty_batch_is_no_data() {
        assert_eq!(aggregate(Vec::<Level>::new()), None);
        assert_eq!(aggregate_or_error(Vec::<Level>::new()), Level::Error);
    }

    #[test]
    fn default_thresholds() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.temperature, Bands::new(50.0, 55.0));
        assert_eq!(thresholds.capacity, Bands::new(5.0, 1.0));
    }
}
