use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single dated creatinine test result.
///
/// Results are kept in the laboratory's reporting unit (µmol/L for the NHS
/// algorithm thresholds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    date: NaiveDateTime,
    result: f64,
}

impl Measurement {
    #[must_use]
    pub const fn new(date: NaiveDateTime, result: f64) -> Self {
        Self { date, result }
    }

    /// Returns `true` if `value` is usable as a creatinine result: finite and
    /// not negative.
    #[must_use]
    pub const fn is_valid_result(value: f64) -> bool {
        value.is_finite() && value >= 0.0
    }

    /// Returns the date and time the sample was taken.
    #[must_use]
    pub const fn date(&self) -> NaiveDateTime {
        self.date
    }

    /// Returns the creatinine result.
    #[must_use]
    pub const fn result(&self) -> f64 {
        self.result
    }
}
