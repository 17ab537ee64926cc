//! Time representation for the clip timeline
//!
//! Timeline positions are plain seconds. Ranges are half-open: a range
//! contains its start but not its end, so two contiguous clips never both
//! claim the instant where one ends and the next begins.

use serde::{Deserialize, Serialize};

/// A position or length on the timeline, in seconds.
pub type Seconds = f64;

/// Clamp a gain or ratio into `[0, 1]`. NaN collapses to zero.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp `value` into `[min, max]`, tolerating `min > max` (the upper bound
/// wins) and NaN inputs (which collapse to `min`).
#[inline]
pub fn clamp_between(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min.min(max);
    }
    value.max(min).min(max)
}

/// A time range with inclusive start and exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: Seconds,
    /// End time (exclusive)
    pub end: Seconds,
}

impl TimeRange {
    /// Create a new time range from start and end times.
    #[inline]
    pub fn new(start: Seconds, end: Seconds) -> Self {
        Self { start, end }
    }

    /// Length of the range.
    #[inline]
    pub fn duration(self) -> Seconds {
        self.end - self.start
    }

    /// True when the range covers no time at all (or is inverted).
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.end > self.start)
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: Seconds) -> bool {
        time >= self.start && time < self.end
    }
}
