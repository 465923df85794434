use akiscan_engine::AkiDecision;
use serde::{Deserialize, Serialize};

/// Names of the classifier input columns, in [`FeatureVector::to_array`] order.
pub const FEATURE_NAMES: [&str; 7] = ["sex", "age", "c1", "rv1", "rv2", "rv_ratio", "D"];

/// Fixed-size feature vector of one patient.
///
/// Serialized with the dataset column names (`D` for the creatinine change,
/// `aki` for the label).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// 1 for female, 0 for male.
    #[serde(rename = "sex")]
    pub sex_binary: u8,
    pub age: u32,
    /// Most recent creatinine result.
    pub c1: f64,
    /// Minimum creatinine result.
    pub rv1: f64,
    /// Median creatinine result.
    pub rv2: f64,
    pub rv_ratio: f64,
    /// Creatinine change within 48 hours of the most recent test.
    #[serde(rename = "D")]
    pub delta: f64,
    /// 1 for AKI, 0 otherwise; only present for training rows.
    #[serde(rename = "aki", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u8>,
}

impl FeatureVector {
    /// Classifier input in [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn to_array(&self) -> [f64; 7] {
        [
            f64::from(self.sex_binary),
            f64::from(self.age),
            self.c1,
            self.rv1,
            self.rv2,
            self.rv_ratio,
            self.delta,
        ]
    }

    /// Applies the NHS AKI rule to this vector.
    #[must_use]
    pub fn decision(&self) -> AkiDecision {
        AkiDecision::evaluate(self.rv_ratio, self.delta)
    }

    /// Returns a copy without the label.
    #[must_use]
    pub fn unlabelled(&self) -> Self {
        Self {
            label: None,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(label: Option<u8>) -> FeatureVector {
        FeatureVector {
            sex_binary: 1,
            age: 64,
            c1: 150.0,
            rv1: 80.0,
            rv2: 95.0,
            rv_ratio: 1.875,
            delta: 12.0,
            label,
        }
    }

    #[test]
    fn array_follows_feature_names() {
        let values = vector(None).to_array();
        assert_eq!(values.len(), FEATURE_NAMES.len());
        assert_eq!(values, [1.0, 64.0, 150.0, 80.0, 95.0, 1.875, 12.0]);
    }

    #[test]
    fn serializes_with_dataset_column_names() {
        let json = serde_json::to_value(vector(Some(1))).unwrap();
        assert_eq!(json["sex"], 1);
        assert_eq!(json["D"], 12.0);
        assert_eq!(json["aki"], 1);

        let json = serde_json::to_value(vector(None)).unwrap();
        assert!(json.get("aki").is_none());
        let back: FeatureVector = serde_json::from_value(json).unwrap();
        assert_eq!(back, vector(None));
    }

    #[test]
    fn decision_uses_ratio_and_delta() {
        assert!(vector(None).decision().is_aki());
        let calm = FeatureVector {
            rv_ratio: 1.1,
            ..vector(None)
        };
        assert!(!calm.decision().is_aki());
    }
}
