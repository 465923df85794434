//! Feature extraction pipeline.
//!
//! [`FeaturePipeline`] runs each raw row through the full chain:
//!
//! 1. **Parse** - [`RecordParser`] builds a [`PatientRecord`]
//! 2. **Order check** - measurements must be in ascending date order
//! 3. **Summarize** - [`SeriesSummary`] gives `c1`, `rv1` and `rv2`
//! 4. **Ratio** - [`ratio::resolve`] bands the RV ratio by time since the previous test
//! 5. **Delta** - [`window::creatinine_delta`] gives the 48-hour change `D`
//!
//! Errors from any step are returned as [`FeatureError`]; no step substitutes
//! a default value for a failed computation.
//!
//! Batches are split into contiguous chunks and extracted on scoped worker
//! threads when more than one worker is configured. Results are reassembled
//! in input order.

use std::{num::NonZeroUsize, panic, thread};

use akiscan_engine::{
    AkiLabel, DivisionByZeroError, InsufficientDataError, InvalidResultError, Mode,
    NegativeElapsedError, ParseError, PatientRecord, RecordParser, SeriesError, SeriesSummary,
    ratio::{self, RatioError},
    window,
};

use crate::{BatchReport, ExtractionConfig, FeatureVector};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum FeatureError {
    #[display("{_0}")]
    Parse(ParseError),
    #[display("{_0}")]
    InsufficientData(InsufficientDataError),
    #[display("{_0}")]
    InvalidResult(InvalidResultError),
    #[display("{_0}")]
    DivisionByZero(DivisionByZeroError),
    #[display("{_0}")]
    NegativeElapsed(NegativeElapsedError),
}

impl From<SeriesError> for FeatureError {
    fn from(error: SeriesError) -> Self {
        match error {
            SeriesError::InsufficientData(e) => Self::InsufficientData(e),
            SeriesError::InvalidResult(e) => Self::InvalidResult(e),
        }
    }
}

impl From<RatioError> for FeatureError {
    fn from(error: RatioError) -> Self {
        match error {
            RatioError::DivisionByZero(e) => Self::DivisionByZero(e),
            RatioError::NegativeElapsed(e) => Self::NegativeElapsed(e),
        }
    }
}

/// Converts raw rows into [`FeatureVector`]s.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    parser: RecordParser,
    workers: NonZeroUsize,
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl FeaturePipeline {
    #[must_use]
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            parser: RecordParser::new(config.labels.clone()),
            workers: config.workers,
        }
    }

    #[must_use]
    pub fn parser(&self) -> &RecordParser {
        &self.parser
    }

    /// Extracts the feature vector of one raw row.
    ///
    /// In [`Mode::Train`] the vector carries the row's binary label.
    ///
    /// # Examples
    ///
    /// ```
    /// use akiscan_features::{FeaturePipeline, Mode};
    ///
    /// let pipeline = FeaturePipeline::default();
    /// let row = ["58", "f", "y", "2024-04-01 10:00:00", "60", "2024-04-03 09:00:00", "100"];
    ///
    /// let train = pipeline.extract_single(&row, Mode::Train)?;
    /// assert_eq!(train.label, Some(1));
    /// assert_eq!(train.delta, 40.0);
    ///
    /// let test = pipeline.extract_single(&row, Mode::Test)?;
    /// assert_eq!(test, train.unlabelled());
    /// # Ok::<(), akiscan_features::FeatureError>(())
    /// ```
    pub fn extract_single<S>(&self, raw_fields: &[S], mode: Mode) -> Result<FeatureVector, FeatureError>
    where
        S: AsRef<str>,
    {
        let record = self.parser.parse(raw_fields, mode)?;
        self.extract_record(&record)
    }

    /// Extracts the feature vector of an already parsed record.
    pub fn extract_record(&self, record: &PatientRecord) -> Result<FeatureVector, FeatureError> {
        let measurements = record.measurements();
        window::check_chronological(measurements)?;

        let summary = SeriesSummary::from_measurements(measurements)?;
        let elapsed = window::elapsed_since_previous(measurements);
        let rv_ratio = ratio::resolve(&summary, elapsed)?;
        let delta = window::creatinine_delta(measurements);

        let vector = FeatureVector {
            sex_binary: record.sex().as_binary(),
            age: record.age(),
            c1: summary.c1,
            rv1: summary.rv1,
            rv2: summary.rv2,
            rv_ratio: rv_ratio.value,
            delta: delta.delta,
            label: record.label().map(AkiLabel::as_binary),
        };
        tracing::debug!(
            measurements = summary.count,
            elapsed_days = elapsed.num_days(),
            band = ?rv_ratio.band,
            rv_ratio = rv_ratio.value,
            delta = delta.delta,
            delta_window_hours = delta.window.num_hours(),
            trigger = ?vector.decision().trigger,
            "extracted patient features"
        );
        Ok(vector)
    }

    /// Applies the NHS AKI rule directly to one raw row.
    ///
    /// # Examples
    ///
    /// ```
    /// use akiscan_features::{FeaturePipeline, Mode};
    /// use akiscan_engine::AkiLabel;
    ///
    /// let pipeline = FeaturePipeline::default();
    /// let row = ["80", "m", "2023-01-10 08:00:00", "90", "2024-01-10 08:00:00", "95"];
    /// assert_eq!(pipeline.detect_aki(&row, Mode::Test)?, AkiLabel::NoAki);
    /// # Ok::<(), akiscan_features::FeatureError>(())
    /// ```
    pub fn detect_aki<S>(&self, raw_fields: &[S], mode: Mode) -> Result<AkiLabel, FeatureError>
    where
        S: AsRef<str>,
    {
        Ok(self.extract_single(raw_fields, mode)?.decision().label())
    }

    /// Extracts feature vectors for a batch of raw rows.
    ///
    /// Records that fail are reported in [`BatchReport::failures`] and
    /// omitted from [`BatchReport::vectors`]; the remaining vectors keep
    /// their input order.
    #[must_use]
    pub fn extract_batch<R, S>(&self, raw_rows: &[R], mode: Mode) -> BatchReport
    where
        R: AsRef<[S]> + Sync,
        S: AsRef<str>,
    {
        BatchReport::from_results(mode, self.extract_all(raw_rows, mode))
    }

    /// Extracts labelled feature vectors for a batch of training rows.
    #[must_use]
    pub fn extract_training_batch<R, S>(&self, raw_rows: &[R]) -> BatchReport
    where
        R: AsRef<[S]> + Sync,
        S: AsRef<str>,
    {
        self.extract_batch(raw_rows, Mode::Train)
    }

    fn extract_all<R, S>(&self, raw_rows: &[R], mode: Mode) -> Vec<Result<FeatureVector, FeatureError>>
    where
        R: AsRef<[S]> + Sync,
        S: AsRef<str>,
    {
        let workers = self.workers.get().min(raw_rows.len());
        if workers <= 1 {
            return raw_rows
                .iter()
                .map(|row| self.extract_single(row.as_ref(), mode))
                .collect();
        }

        let chunk_size = raw_rows.len().div_ceil(workers);
        thread::scope(|s| {
            let handles = raw_rows
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move || {
                        chunk
                            .iter()
                            .map(|row| self.extract_single(row.as_ref(), mode))
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use akiscan_engine::{LabelTokens, Measurement, ReferenceValue, Sex};
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn training_row(age: u32, sex: &str, label: &str, tests: &[(i64, f64)]) -> Vec<String> {
        let mut row = vec![age.to_string(), sex.to_owned(), label.to_owned()];
        for (hours, result) in tests {
            let date = base() + TimeDelta::hours(*hours);
            row.push(date.format("%Y-%m-%d %H:%M:%S").to_string());
            row.push(result.to_string());
        }
        row
    }

    fn with_workers(workers: usize) -> FeaturePipeline {
        FeaturePipeline::new(&ExtractionConfig {
            workers: NonZeroUsize::new(workers).unwrap(),
            ..ExtractionConfig::default()
        })
    }

    #[test]
    fn single_measurement_has_unit_ratio_and_no_delta() {
        let row = training_row(50, "m", "n", &[(0, 88.0)]);
        let vector = FeaturePipeline::default()
            .extract_single(&row, Mode::Train)
            .unwrap();
        assert_eq!(vector.c1, 88.0);
        assert_eq!(vector.rv1, 88.0);
        assert_eq!(vector.rv2, 88.0);
        assert_eq!(vector.rv_ratio, 1.0);
        assert_eq!(vector.delta, 0.0);
        assert_eq!(vector.label, Some(0));
        assert_eq!(vector.sex_binary, 0);
    }

    #[test]
    fn baseline_band_uses_median() {
        let day = 24;
        let row = training_row(
            62,
            "f",
            "y",
            &[(0, 60.0), (10 * day, 80.0), (20 * day, 100.0), (40 * day, 150.0)],
        );
        let vector = FeaturePipeline::default()
            .extract_single(&row, Mode::Train)
            .unwrap();
        assert_eq!(vector.rv1, 60.0);
        assert_eq!(vector.rv2, 90.0);
        assert!((vector.rv_ratio - 150.0 / 90.0).abs() < 1e-12);
        assert_eq!(vector.delta, 0.0);
        assert_eq!(vector.sex_binary, 1);
        assert_eq!(vector.label, Some(1));
        assert!(vector.decision().is_aki());
    }

    #[test]
    fn stale_history_relies_on_delta_only() {
        let row = training_row(45, "m", "n", &[(0, 60.0), (400 * 24, 150.0)]);
        let vector = FeaturePipeline::default()
            .extract_single(&row, Mode::Train)
            .unwrap();
        assert_eq!(vector.rv_ratio, 0.0);
        assert_eq!(vector.delta, 0.0);
        assert!(!vector.decision().is_aki());
    }

    #[test]
    fn training_row_reparsed_as_test_keeps_features() {
        let row = training_row(70, "f", "y", &[(0, 70.0), (30, 85.0), (50, 120.0)]);
        let pipeline = FeaturePipeline::default();
        let train = pipeline.extract_single(&row, Mode::Train).unwrap();
        let test = pipeline.extract_single(&row, Mode::Test).unwrap();
        assert_eq!(train.label, Some(1));
        assert_eq!(test.label, None);
        assert_eq!(test, train.unlabelled());

        let parser = pipeline.parser();
        assert_eq!(
            parser.parse(&row, Mode::Test).unwrap(),
            parser.parse(&row, Mode::Train).unwrap().without_label()
        );
    }

    #[test]
    fn configured_label_tokens_reach_the_parser() {
        let pipeline = FeaturePipeline::new(&ExtractionConfig {
            labels: LabelTokens::new("aki", "ok"),
            ..ExtractionConfig::default()
        });
        assert_eq!(pipeline.parser().tokens(), &LabelTokens::new("aki", "ok"));

        let row = training_row(70, "m", "aki", &[(0, 70.0)]);
        assert_eq!(
            pipeline.extract_single(&row, Mode::Train).unwrap().label,
            Some(1)
        );
        assert_eq!(
            pipeline.extract_single(&row, Mode::Test).unwrap().label,
            None
        );
    }

    #[test]
    fn unknown_label_token_is_negative() {
        let row = training_row(70, "f", "unknown", &[(0, 70.0)]);
        let vector = FeaturePipeline::default()
            .extract_single(&row, Mode::Train)
            .unwrap();
        assert_eq!(vector.label, Some(0));
    }

    #[test]
    fn errors_are_surfaced_not_defaulted() {
        let pipeline = FeaturePipeline::default();

        let no_tests = training_row(30, "m", "n", &[]);
        assert_eq!(
            pipeline.extract_single(&no_tests, Mode::Train),
            Err(FeatureError::InsufficientData(InsufficientDataError {
                required: 1,
                available: 0
            }))
        );

        let zero = training_row(30, "m", "n", &[(0, 0.0), (5, 40.0)]);
        assert_eq!(
            pipeline.extract_single(&zero, Mode::Train),
            Err(FeatureError::DivisionByZero(DivisionByZeroError {
                reference: ReferenceValue::Rv1
            }))
        );

        let unsorted = training_row(30, "m", "n", &[(10, 50.0), (0, 40.0)]);
        assert!(matches!(
            pipeline.extract_single(&unsorted, Mode::Train),
            Err(FeatureError::NegativeElapsed(_))
        ));

        assert!(matches!(
            pipeline.extract_single(&["30", "m", "2024-01-01"], Mode::Test),
            Err(FeatureError::Parse(ParseError::UnpairedField { .. }))
        ));
    }

    #[test]
    fn extract_record_accepts_parsed_records() {
        let record = PatientRecord::new(
            20,
            Sex::Female,
            None,
            vec![
                Measurement::new(base(), 50.0),
                Measurement::new(base() + TimeDelta::hours(24), 80.0),
            ],
        );
        let vector = FeaturePipeline::default().extract_record(&record).unwrap();
        assert_eq!(vector.delta, 30.0);
        assert_eq!(vector.rv_ratio, 1.6);
        assert_eq!(vector.label, None);
    }

    #[test]
    fn extract_record_rejects_invalid_results() {
        let record = PatientRecord::new(
            40,
            Sex::Male,
            None,
            vec![
                Measurement::new(base(), f64::NAN),
                Measurement::new(base() + TimeDelta::hours(1), 80.0),
            ],
        );
        assert!(matches!(
            FeaturePipeline::default().extract_record(&record),
            Err(FeatureError::InvalidResult(InvalidResultError { index: 0, .. }))
        ));

        let record = PatientRecord::new(
            40,
            Sex::Male,
            None,
            vec![
                Measurement::new(base(), 60.0),
                Measurement::new(base() + TimeDelta::hours(1), -5.0),
            ],
        );
        assert_eq!(
            FeaturePipeline::default().extract_record(&record),
            Err(FeatureError::InvalidResult(InvalidResultError {
                index: 1,
                value: -5.0
            }))
        );
    }

    #[test]
    fn detect_aki_flags_sharp_rise() {
        let pipeline = FeaturePipeline::default();
        let rising = training_row(66, "m", "n", &[(0, 80.0), (20, 110.0)]);
        assert_eq!(pipeline.detect_aki(&rising, Mode::Test), Ok(AkiLabel::Aki));
        let stable = training_row(66, "m", "y", &[(0, 80.0), (20, 90.0)]);
        assert_eq!(pipeline.detect_aki(&stable, Mode::Test), Ok(AkiLabel::NoAki));
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let rows = vec![
            training_row(20, "m", "n", &[(0, 70.0)]),
            vec!["bad".to_owned(), "m".to_owned(), "n".to_owned()],
            training_row(30, "f", "y", &[(0, 60.0), (24, 100.0)]),
            training_row(40, "m", "n", &[(0, 0.0), (24, 100.0)]),
            training_row(50, "f", "n", &[(0, 90.0)]),
        ];
        let report = FeaturePipeline::default().extract_training_batch(&rows);

        assert_eq!(report.total, 5);
        assert_eq!(
            report.vectors.iter().map(|v| v.age).collect::<Vec<_>>(),
            [20, 30, 50]
        );
        assert_eq!(
            report.failures.iter().map(|f| f.index).collect::<Vec<_>>(),
            [1, 3]
        );
        assert!(matches!(report.failures[0].error, FeatureError::Parse(_)));
        assert!(matches!(
            report.failures[1].error,
            FeatureError::DivisionByZero(_)
        ));
    }

    #[test]
    fn parallel_extraction_matches_sequential() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let rows = (0..97)
            .map(|i| {
                let count = rng.random_range(0..8);
                let mut hours = 0;
                let tests = (0..count)
                    .map(|_| {
                        hours += rng.random_range(0..24 * 10);
                        (hours, f64::from(rng.random_range(0..300_u32)))
                    })
                    .collect::<Vec<_>>();
                let label = if i % 3 == 0 { "y" } else { "n" };
                training_row(rng.random_range(0..100), "f", label, &tests)
            })
            .collect::<Vec<_>>();

        let sequential = with_workers(1).extract_training_batch(&rows);
        for workers in [2, 4, 16, 200] {
            let parallel = with_workers(workers).extract_training_batch(&rows);
            assert_eq!(parallel.vectors, sequential.vectors, "workers={workers}");
            assert_eq!(parallel.failures, sequential.failures, "workers={workers}");
        }
        assert_eq!(
            sequential.vectors.len() + sequential.failures.len(),
            rows.len()
        );
    }

    #[test]
    fn empty_batch_is_empty_report() {
        let rows: Vec<Vec<String>> = vec![];
        let report = with_workers(4).extract_batch(&rows, Mode::Test);
        assert_eq!(report.total, 0);
        assert!(report.vectors.is_empty());
        assert!(report.failures.is_empty());
    }
}
