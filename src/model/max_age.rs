//! Expiry threshold applied on read.

use std::time::Duration;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Maximum age of a readable entry, held in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxAge {
    millis: f64,
}

impl MaxAge {
    /// Threshold of `days` days. Fractional and negative values are accepted;
    /// a negative threshold expires everything written in the past.
    pub fn days(days: f64) -> Self {
        Self {
            millis: days * MILLIS_PER_DAY,
        }
    }

    pub fn from_millis(millis: f64) -> Self {
        Self { millis }
    }

    pub fn as_millis(&self) -> f64 {
        self.millis
    }

    /// Strict comparison: an age equal to the threshold is still fresh.
    /// A NaN threshold never expires anything.
    pub fn is_exceeded_by(&self, age_millis: i64) -> bool {
        (age_millis as f64) > self.millis
    }
}

impl From<Duration> for MaxAge {
    fn from(d: Duration) -> Self {
        Self {
            millis: d.as_millis() as f64,
        }
    }
}
