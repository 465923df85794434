//! Clinical computations over a patient's creatinine history.
//!
//! - [`reference_interval`] - Population reference intervals by age and sex
//! - [`SeriesSummary`] - Most recent, minimum and median results (`c1`, `rv1`, `rv2`)
//! - [`window`] - Elapsed time between tests and the 48-hour creatinine change `D`
//! - [`ratio`] - The RV ratio, banded by time since the previous test
//! - [`AkiDecision`] - The NHS AKI decision rule
//!
//! The computations are independent pure functions; chaining them per
//! patient is the job of the feature pipeline.

pub use self::{reference_interval::ReferenceInterval, rule::*, series::*};

pub mod ratio;
pub mod reference_interval;
mod rule;
mod series;
pub mod window;
