//! Per-patient feature extraction for AKI detection and classifier training
//!
//! This crate chains record parsing and the clinical computations of
//! `akiscan-engine` into one [`FeatureVector`] per patient, and assembles
//! batches of them for a downstream classifier.
//!
//! # Overview
//!
//! ```text
//! raw row (age, sex, [label], date, result, ...)
//!     ↓ RecordParser
//! PatientRecord
//!     ↓ SeriesSummary, window, ratio
//! FeatureVector (sex, age, c1, rv1, rv2, rv_ratio, D, [aki])
//!     ↓ AkiDecision
//! AKI flag
//! ```
//!
//! - [`config`]: Extraction settings (label tokens, worker count) loaded from JSON
//! - [`feature_vector`]: The fixed-size per-patient feature vector
//! - [`pipeline`]: [`FeaturePipeline`] for single rows and batches
//! - [`batch`]: [`BatchReport`] collecting vectors and per-record failures
//!
//! # Error Isolation
//!
//! A record that fails to parse or to produce features never aborts a batch.
//! The failure is logged with `tracing`, recorded in the report with its row
//! index, and the remaining records are still extracted in their input order.
//!
//! # Examples
//!
//! ```
//! use akiscan_features::{Mode, extract_single, extract_training_batch};
//!
//! let features = extract_single(
//!     &["71", "m", "2024-02-01 07:00:00", "90", "2024-02-02 07:00:00", "95"],
//!     Mode::Test,
//! )?;
//! assert_eq!(features.c1, 95.0);
//! assert_eq!(features.label, None);
//!
//! let rows = vec![
//!     vec!["71", "m", "y", "2024-02-01 07:00:00", "90", "2024-02-02 07:00:00", "140"],
//!     vec!["35", "f", "n", "not a date", "70"],
//!     vec!["35", "f", "n", "2024-02-01 07:00:00", "70", "", ""],
//! ];
//! let report = extract_training_batch(&rows);
//! assert_eq!(report.vectors.len(), 2);
//! assert_eq!(report.failures[0].index, 1);
//! assert_eq!(report.labels(), [1, 0]);
//! # Ok::<(), akiscan_features::FeatureError>(())
//! ```

pub use akiscan_engine::Mode;

pub use self::{
    batch::{BatchReport, RecordFailure},
    config::{ConfigError, ExtractionConfig},
    feature_vector::FeatureVector,
    pipeline::{FeatureError, FeaturePipeline},
};

pub mod batch;
pub mod config;
pub mod feature_vector;
pub mod pipeline;

/// Extracts the feature vector of one raw row with the default configuration.
pub fn extract_single<S>(raw_fields: &[S], mode: Mode) -> Result<FeatureVector, FeatureError>
where
    S: AsRef<str>,
{
    FeaturePipeline::default().extract_single(raw_fields, mode)
}

/// Extracts labelled feature vectors from training rows with the default configuration.
#[must_use]
pub fn extract_training_batch<R, S>(raw_rows: &[R]) -> BatchReport
where
    R: AsRef<[S]> + Sync,
    S: AsRef<str>,
{
    FeaturePipeline::default().extract_training_batch(raw_rows)
}
