use akiscan_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::{InsufficientDataError, InvalidResultError, Measurement};

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SeriesError {
    #[display("{_0}")]
    InsufficientData(InsufficientDataError),
    #[display("{_0}")]
    InvalidResult(InvalidResultError),
}

/// Summary statistics of a patient's creatinine results.
///
/// # Examples
///
/// ```
/// use akiscan_engine::{Measurement, SeriesSummary};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let measurements = [
///     Measurement::new(day(1), 90.0),
///     Measurement::new(day(2), 70.0),
///     Measurement::new(day(3), 110.0),
///     Measurement::new(day(4), 100.0),
/// ];
/// let summary = SeriesSummary::from_measurements(&measurements)?;
/// assert_eq!(summary.c1, 100.0);
/// assert_eq!(summary.rv1, 70.0);
/// assert_eq!(summary.rv2, 95.0);
/// # Ok::<(), akiscan_engine::SeriesError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Result of the last measurement in the series.
    pub c1: f64,
    /// Minimum result.
    pub rv1: f64,
    /// Median result.
    pub rv2: f64,
    pub mean: f64,
    pub max: f64,
    pub count: usize,
}

impl SeriesSummary {
    /// Summarizes a measurement series.
    ///
    /// `c1` is taken from the last element as supplied, so the series must
    /// already be in ascending date order. Every result must be finite and
    /// non-negative.
    pub fn from_measurements(measurements: &[Measurement]) -> Result<Self, SeriesError> {
        if let Some((index, value)) = measurements
            .iter()
            .map(Measurement::result)
            .enumerate()
            .find(|(_, value)| !Measurement::is_valid_result(*value))
        {
            return Err(InvalidResultError { index, value }.into());
        }

        let insufficient = InsufficientDataError {
            required: 1,
            available: measurements.len(),
        };
        let last = measurements.last().ok_or(insufficient)?;
        let stats =
            DescriptiveStats::new(measurements.iter().map(Measurement::result)).ok_or(insufficient)?;

        Ok(Self {
            c1: last.result(),
            rv1: stats.min,
            rv2: stats.median,
            mean: stats.mean,
            max: stats.max,
            count: stats.count,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn series(results: &[f64]) -> Vec<Measurement> {
        (1..)
            .zip(results)
            .map(|(d, r)| Measurement::new(day(d), *r))
            .collect()
    }

    #[test]
    fn empty_series_is_insufficient() {
        assert_eq!(
            SeriesSummary::from_measurements(&[]),
            Err(SeriesError::InsufficientData(InsufficientDataError {
                required: 1,
                available: 0
            }))
        );
    }

    #[test]
    fn invalid_results_are_rejected() {
        assert!(matches!(
            SeriesSummary::from_measurements(&series(&[70.0, f64::NAN, 90.0])),
            Err(SeriesError::InvalidResult(InvalidResultError { index: 1, .. }))
        ));
        assert_eq!(
            SeriesSummary::from_measurements(&series(&[70.0, 90.0, -1.0])),
            Err(SeriesError::InvalidResult(InvalidResultError {
                index: 2,
                value: -1.0
            }))
        );
        assert!(SeriesSummary::from_measurements(&series(&[f64::INFINITY])).is_err());
    }

    #[test]
    fn single_measurement_is_its_own_reference() {
        let summary = SeriesSummary::from_measurements(&series(&[88.0])).unwrap();
        assert_eq!(summary.c1, 88.0);
        assert_eq!(summary.rv1, 88.0);
        assert_eq!(summary.rv2, 88.0);
        assert_eq!(summary.count, 1);
    }

    #[test]
    fn most_recent_is_not_the_maximum() {
        let summary = SeriesSummary::from_measurements(&series(&[60.0, 150.0, 90.0])).unwrap();
        assert_eq!(summary.c1, 90.0);
        assert_eq!(summary.max, 150.0);
        assert_eq!(summary.rv1, 60.0);
        assert_eq!(summary.rv2, 90.0);
    }

    #[test]
    fn reversing_the_series_changes_only_c1() {
        let forward = series(&[60.0, 75.0, 150.0]);
        let mut backward = forward.clone();
        backward.reverse();

        let forward = SeriesSummary::from_measurements(&forward).unwrap();
        let backward = SeriesSummary::from_measurements(&backward).unwrap();
        assert_eq!(forward.c1, 150.0);
        assert_eq!(backward.c1, 60.0);
        assert_eq!(forward.rv1, backward.rv1);
        assert_eq!(forward.rv2, backward.rv2);
    }

    #[test]
    fn median_of_even_series_averages_middle_pair() {
        let summary =
            SeriesSummary::from_measurements(&series(&[80.0, 60.0, 100.0, 70.0])).unwrap();
        assert_eq!(summary.rv2, 75.0);
        assert_eq!(summary.mean, 77.5);
    }
}
