//! RV ratio: the most recent result relative to a reference value.
//!
//! The reference value depends on how long ago the previous test was taken:
//!
//! | elapsed since previous test | band | ratio |
//! |---|---|---|
//! | 0 ≤ e ≤ 7 days | [`RatioBand::Acute`] | `c1 / rv1` |
//! | 7 days < e ≤ 365 days | [`RatioBand::Baseline`] | `c1 / rv2` |
//! | e > 365 days | [`RatioBand::Stale`] | `0` |

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::{DivisionByZeroError, NegativeElapsedError, ReferenceValue, SeriesSummary};

pub const ACUTE_LIMIT: TimeDelta = TimeDelta::days(7);
pub const BASELINE_LIMIT: TimeDelta = TimeDelta::days(365);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RatioError {
    #[display("{_0}")]
    DivisionByZero(DivisionByZeroError),
    #[display("{_0}")]
    NegativeElapsed(NegativeElapsedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum RatioBand {
    /// Previous test within 7 days: compare against the minimum (`rv1`).
    Acute,
    /// Previous test within a year: compare against the median (`rv2`).
    Baseline,
    /// Previous test more than a year ago: no ratio.
    Stale,
}

impl RatioBand {
    /// Selects the band for the time elapsed since the previous test.
    ///
    /// Both limits belong to the shorter band, so exactly 7 days is
    /// [`RatioBand::Acute`] and exactly 365 days is [`RatioBand::Baseline`].
    pub fn for_elapsed(elapsed: TimeDelta) -> Result<Self, NegativeElapsedError> {
        if elapsed < TimeDelta::zero() {
            Err(NegativeElapsedError { elapsed })
        } else if elapsed <= ACUTE_LIMIT {
            Ok(Self::Acute)
        } else if elapsed <= BASELINE_LIMIT {
            Ok(Self::Baseline)
        } else {
            Ok(Self::Stale)
        }
    }

    /// The reference value this band divides by, if any.
    #[must_use]
    pub const fn reference(self) -> Option<ReferenceValue> {
        match self {
            Self::Acute => Some(ReferenceValue::Rv1),
            Self::Baseline => Some(ReferenceValue::Rv2),
            Self::Stale => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RvRatio {
    pub band: RatioBand,
    pub value: f64,
}

/// Computes the RV ratio for a series summary.
///
/// # Examples
///
/// ```
/// use akiscan_engine::{SeriesSummary, ratio::{self, RatioBand}};
/// use chrono::TimeDelta;
///
/// let summary = SeriesSummary { c1: 150.0, rv1: 75.0, rv2: 100.0, mean: 105.0, max: 150.0, count: 4 };
///
/// let acute = ratio::resolve(&summary, TimeDelta::days(2))?;
/// assert_eq!((acute.band, acute.value), (RatioBand::Acute, 2.0));
///
/// let baseline = ratio::resolve(&summary, TimeDelta::days(30))?;
/// assert_eq!((baseline.band, baseline.value), (RatioBand::Baseline, 1.5));
/// # Ok::<(), ratio::RatioError>(())
/// ```
pub fn resolve(summary: &SeriesSummary, elapsed: TimeDelta) -> Result<RvRatio, RatioError> {
    let band = RatioBand::for_elapsed(elapsed)?;
    let value = match band.reference() {
        Some(reference) => {
            let divisor = match reference {
                ReferenceValue::Rv1 => summary.rv1,
                ReferenceValue::Rv2 => summary.rv2,
            };
            if divisor == 0.0 {
                return Err(DivisionByZeroError { reference }.into());
            }
            summary.c1 / divisor
        }
        None => 0.0,
    };
    Ok(RvRatio { band, value })
}
