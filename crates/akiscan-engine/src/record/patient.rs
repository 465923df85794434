use serde::{Deserialize, Serialize};

use crate::{InvalidLabelError, Measurement};

/// Patient sex as recorded in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[display("m")]
    Male,
    #[display("f")]
    Female,
}

impl Sex {
    /// Parses a sex token (`m`/`male`, `f`/`female`, case-insensitive).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("f") || token.eq_ignore_ascii_case("female") {
            Some(Self::Female)
        } else if token.eq_ignore_ascii_case("m") || token.eq_ignore_ascii_case("male") {
            Some(Self::Male)
        } else {
            None
        }
    }

    /// Binary encoding used in feature vectors: 1 for female, 0 for male.
    #[must_use]
    pub const fn as_binary(self) -> u8 {
        match self {
            Self::Male => 0,
            Self::Female => 1,
        }
    }
}

/// Textual tokens marking a positive and a negative AKI label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTokens {
    /// Token for a positive AKI diagnosis.
    pub truth: String,
    /// Token for a negative AKI diagnosis.
    pub falsy: String,
}

impl Default for LabelTokens {
    fn default() -> Self {
        Self {
            truth: "y".to_owned(),
            falsy: "n".to_owned(),
        }
    }
}

impl LabelTokens {
    #[must_use]
    pub fn new(truth: impl Into<String>, falsy: impl Into<String>) -> Self {
        Self {
            truth: truth.into(),
            falsy: falsy.into(),
        }
    }

    /// Returns `true` when `value` is exactly the positive token.
    ///
    /// Any other value, including unknown tokens, decodes as negative.
    #[must_use]
    pub fn is_truth_token(&self, value: &str) -> bool {
        value == self.truth
    }

    /// Returns `true` when `value` is either accepted label token.
    #[must_use]
    pub fn is_label_token(&self, value: &str) -> bool {
        value == self.truth || value == self.falsy
    }
}

/// Ground-truth or predicted AKI outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum AkiLabel {
    Aki,
    NoAki,
}

impl AkiLabel {
    /// Decodes a textual label. Only the truth token maps to [`AkiLabel::Aki`].
    #[must_use]
    pub fn from_token(token: &str, tokens: &LabelTokens) -> Self {
        if tokens.is_truth_token(token) {
            Self::Aki
        } else {
            Self::NoAki
        }
    }

    /// Converts a binary classifier output back into a label.
    ///
    /// # Examples
    ///
    /// ```
    /// use akiscan_engine::AkiLabel;
    ///
    /// assert_eq!(AkiLabel::from_binary(1), Ok(AkiLabel::Aki));
    /// assert_eq!(AkiLabel::from_binary(0), Ok(AkiLabel::NoAki));
    /// assert!(AkiLabel::from_binary(2).is_err());
    /// ```
    pub fn from_binary(value: i64) -> Result<Self, InvalidLabelError> {
        match value {
            1 => Ok(Self::Aki),
            0 => Ok(Self::NoAki),
            _ => Err(InvalidLabelError { value }),
        }
    }

    #[must_use]
    pub const fn as_binary(self) -> u8 {
        match self {
            Self::Aki => 1,
            Self::NoAki => 0,
        }
    }

    /// Returns the textual token for this label.
    #[must_use]
    pub fn token(self, tokens: &LabelTokens) -> &str {
        match self {
            Self::Aki => &tokens.truth,
            Self::NoAki => &tokens.falsy,
        }
    }
}

/// A patient's demographics and creatinine history.
///
/// Measurements are kept in the order they were supplied. Callers are
/// responsible for supplying them in ascending date order; nothing here
/// re-sorts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    age: u32,
    sex: Sex,
    label: Option<AkiLabel>,
    measurements: Vec<Measurement>,
}

impl PatientRecord {
    #[must_use]
    pub fn new(
        age: u32,
        sex: Sex,
        label: Option<AkiLabel>,
        measurements: Vec<Measurement>,
    ) -> Self {
        Self {
            age,
            sex,
            label,
            measurements,
        }
    }

    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub const fn sex(&self) -> Sex {
        self.sex
    }

    /// Returns the recorded label; present only for training rows.
    #[must_use]
    pub const fn label(&self) -> Option<AkiLabel> {
        self.label
    }

    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Returns a copy of this record with the label removed.
    #[must_use]
    pub fn without_label(&self) -> Self {
        Self {
            label: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_tokens_are_case_insensitive() {
        assert_eq!(Sex::from_token("F"), Some(Sex::Female));
        assert_eq!(Sex::from_token("female"), Some(Sex::Female));
        assert_eq!(Sex::from_token(" m "), Some(Sex::Male));
        assert_eq!(Sex::from_token("x"), None);
        assert_eq!(Sex::Female.as_binary(), 1);
        assert_eq!(Sex::Male.as_binary(), 0);
    }

    #[test]
    fn unknown_label_token_decodes_as_negative() {
        let tokens = LabelTokens::default();
        assert_eq!(AkiLabel::from_token("y", &tokens), AkiLabel::Aki);
        assert_eq!(AkiLabel::from_token("n", &tokens), AkiLabel::NoAki);
        assert_eq!(AkiLabel::from_token("maybe", &tokens), AkiLabel::NoAki);
        assert_eq!(AkiLabel::from_token("Y", &tokens), AkiLabel::NoAki);
    }

    #[test]
    fn label_tokens_round_trip_through_binary() {
        let tokens = LabelTokens::new("yes", "no");
        for value in [0, 1] {
            let label = AkiLabel::from_binary(value).unwrap();
            assert_eq!(i64::from(label.as_binary()), value);
            assert_eq!(
                AkiLabel::from_token(label.token(&tokens), &tokens),
                label
            );
        }
        assert_eq!(
            AkiLabel::from_binary(-1),
            Err(InvalidLabelError { value: -1 })
        );
    }
}
