//! Elapsed-time computations over a date-sorted measurement series.
//!
//! - [`elapsed_since_previous`] - Time between the two most recent tests
//! - [`creatinine_delta`] - Creatinine change `D` within the 48 hours before the most recent test
//! - [`inter_test_gaps`] - Whole days between every consecutive pair of tests
//!
//! All functions assume the series is in ascending date order. Use
//! [`check_chronological`] to reject series that are not.

use chrono::TimeDelta;

use crate::{Measurement, NegativeElapsedError};

/// Look-back window for the creatinine change `D`.
pub const DELTA_WINDOW: TimeDelta = TimeDelta::hours(48);

/// Verifies that no measurement is dated before its predecessor.
pub fn check_chronological(measurements: &[Measurement]) -> Result<(), NegativeElapsedError> {
    measurements
        .windows(2)
        .map(|pair| pair[1].date() - pair[0].date())
        .find(|elapsed| *elapsed < TimeDelta::zero())
        .map_or(Ok(()), |elapsed| Err(NegativeElapsedError { elapsed }))
}

/// Time between the most recent and the second most recent test.
///
/// Zero when fewer than two measurements exist.
#[must_use]
pub fn elapsed_since_previous(measurements: &[Measurement]) -> TimeDelta {
    match measurements {
        [.., previous, latest] => latest.date() - previous.date(),
        _ => TimeDelta::zero(),
    }
}

/// [`elapsed_since_previous`] in whole days, truncated toward zero.
#[must_use]
pub fn elapsed_days(measurements: &[Measurement]) -> i64 {
    elapsed_since_previous(measurements).num_days()
}

/// Whole days between each consecutive pair of tests, oldest first.
#[must_use]
pub fn inter_test_gaps(measurements: &[Measurement]) -> Vec<i64> {
    measurements
        .windows(2)
        .map(|pair| (pair[1].date() - pair[0].date()).num_days())
        .collect()
}

/// Creatinine change within the 48 hours preceding the most recent test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatinineDelta {
    /// Time from the oldest result used to the most recent test.
    pub window: TimeDelta,
    /// Most recent result minus the lowest earlier result in the window.
    ///
    /// Negative when creatinine has fallen.
    pub delta: f64,
}

impl CreatinineDelta {
    const NONE: Self = Self {
        window: TimeDelta::zero(),
        delta: 0.0,
    };
}

/// Computes the creatinine change `D`.
///
/// Walks backward from the most recent test, accumulating the gaps between
/// consecutive tests. Each earlier result is used while the cumulative
/// elapsed time stays within [`DELTA_WINDOW`]; the walk stops at the first
/// test beyond it. If no earlier result falls inside the window, both the
/// window and the delta are zero.
///
/// # Examples
///
/// ```
/// use akiscan_engine::{Measurement, window};
/// use chrono::{NaiveDate, TimeDelta};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let measurements = [
///     Measurement::new(day(1), 1.0),
///     Measurement::new(day(2), 1.2),
///     Measurement::new(day(4), 2.0),
/// ];
/// let delta = window::creatinine_delta(&measurements);
/// assert!((delta.delta - 0.8).abs() < 1e-9);
/// assert_eq!(delta.window, TimeDelta::hours(48));
/// ```
#[must_use]
pub fn creatinine_delta(measurements: &[Measurement]) -> CreatinineDelta {
    let Some((latest, earlier)) = measurements.split_last() else {
        return CreatinineDelta::NONE;
    };

    let mut cumulative = TimeDelta::zero();
    let mut window = TimeDelta::zero();
    let mut lowest: Option<f64> = None;
    let mut newer = latest;
    for older in earlier.iter().rev() {
        cumulative += newer.date() - older.date();
        if cumulative > DELTA_WINDOW {
            break;
        }
        window = cumulative;
        lowest = Some(lowest.map_or(older.result(), |r| r.min(older.result())));
        newer = older;
    }

    match lowest {
        Some(lowest) => CreatinineDelta {
            window,
            delta: latest.result() - lowest,
        },
        None => CreatinineDelta::NONE,
    }
}
