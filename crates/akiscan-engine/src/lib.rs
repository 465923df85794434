//! Creatinine record parsing and NHS AKI rule evaluation.
//!
//! This crate turns a flat row of raw laboratory fields into a structured
//! [`PatientRecord`] and evaluates the pieces of the NHS Acute Kidney Injury
//! algorithm over its creatinine history:
//!
//! - [`record`] - Domain model ([`Measurement`], [`PatientRecord`], [`Sex`], [`AkiLabel`])
//!   and the [`RecordParser`]
//! - [`clinical`] - Reference intervals, series statistics, elapsed-time windows,
//!   the RV ratio and the final decision rule
//!
//! # Example
//!
//! ```
//! use akiscan_engine::{AkiDecision, Mode, RecordParser, SeriesSummary, clinical::{ratio, window}};
//!
//! let row = ["67", "f", "2024-03-01 08:00:00", "80", "2024-03-02 08:00:00", "130"];
//! let record = RecordParser::default().parse(&row, Mode::Test)?;
//!
//! let summary = SeriesSummary::from_measurements(record.measurements())?;
//! let elapsed = window::elapsed_since_previous(record.measurements());
//! let rv_ratio = ratio::resolve(&summary, elapsed)?;
//! let delta = window::creatinine_delta(record.measurements());
//!
//! let decision = AkiDecision::evaluate(rv_ratio.value, delta.delta);
//! assert!(decision.is_aki());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use chrono::TimeDelta;

pub use self::{clinical::*, record::*};

pub mod clinical;
pub mod record;

/// A statistic was requested over fewer measurements than it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("at least {required} creatinine measurement(s) required, {available} available")]
pub struct InsufficientDataError {
    pub required: usize,
    pub available: usize,
}

/// Reference value used as the RV ratio divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ReferenceValue {
    /// Minimum result (`rv1`).
    #[display("rv1")]
    Rv1,
    /// Median result (`rv2`).
    #[display("rv2")]
    Rv2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("reference value {reference} is zero")]
pub struct DivisionByZeroError {
    pub reference: ReferenceValue,
}

/// Two consecutive measurements are dated in descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("measurements are not in chronological order (elapsed {elapsed})")]
pub struct NegativeElapsedError {
    pub elapsed: TimeDelta,
}

/// A measurement holds a negative or non-finite result.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("creatinine result {value} of measurement {index} is not a non-negative number")]
pub struct InvalidResultError {
    pub index: usize,
    pub value: f64,
}

/// A binary label other than 0 or 1 was handed to label re-conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid binary label '{value}' for re-conversion")]
pub struct InvalidLabelError {
    pub value: i64,
}
