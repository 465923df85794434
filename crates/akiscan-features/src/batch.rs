//! Batch extraction results.

use std::fmt;

use akiscan_engine::Mode;
use serde::{Serialize, Serializer};

use crate::{FeatureError, FeatureVector};

/// A record that could not be turned into a feature vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    /// Position of the record in the input batch.
    pub index: usize,
    #[serde(serialize_with = "serialize_display")]
    pub error: FeatureError,
}

/// Outcome of extracting a batch of raw rows.
///
/// `vectors` holds the feature vectors of every successful record in input
/// order; `failures` lists the rest with their input positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub mode: Mode,
    /// Number of input records.
    pub total: usize,
    pub vectors: Vec<FeatureVector>,
    pub failures: Vec<RecordFailure>,
}

impl BatchReport {
    /// Splits per-record results into vectors and failures, logging each failure.
    #[must_use]
    pub fn from_results<I>(mode: Mode, results: I) -> Self
    where
        I: IntoIterator<Item = Result<FeatureVector, FeatureError>>,
    {
        let mut total = 0;
        let mut vectors = vec![];
        let mut failures = vec![];
        for (index, result) in results.into_iter().enumerate() {
            total += 1;
            match result {
                Ok(vector) => vectors.push(vector),
                Err(error) => {
                    tracing::warn!(index, %error, "skipping patient record");
                    failures.push(RecordFailure { index, error });
                }
            }
        }
        tracing::info!(
            %mode,
            total,
            extracted = vectors.len(),
            failed = failures.len(),
            "feature extraction finished"
        );
        Self {
            mode,
            total,
            vectors,
            failures,
        }
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Classifier input rows, one per extracted vector.
    #[must_use]
    pub fn feature_matrix(&self) -> Vec<[f64; 7]> {
        self.vectors.iter().map(FeatureVector::to_array).collect()
    }

    /// Binary labels of the extracted vectors.
    ///
    /// Empty for test batches, which carry no labels.
    #[must_use]
    pub fn labels(&self) -> Vec<u8> {
        self.vectors.iter().filter_map(|v| v.label).collect()
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
