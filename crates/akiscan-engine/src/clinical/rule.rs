use serde::{Deserialize, Serialize};

use crate::AkiLabel;

/// RV ratio at or above which AKI is flagged.
pub const RATIO_THRESHOLD: f64 = 1.5;

/// Creatinine change `D` above which AKI is flagged.
pub const DELTA_THRESHOLD: f64 = 26.0;

/// The rule branch that flagged AKI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum AkiTrigger {
    #[display("rv_ratio >= {}", RATIO_THRESHOLD)]
    Ratio,
    #[display("D > {}", DELTA_THRESHOLD)]
    Delta,
}

/// Outcome of the NHS AKI decision rule.
///
/// The rule is checked in order and the first match wins:
///
/// 1. `rv_ratio >= 1.5` flags AKI
/// 2. otherwise `D > 26` flags AKI
/// 3. otherwise no AKI
///
/// # Examples
///
/// ```
/// use akiscan_engine::{AkiDecision, AkiLabel, AkiTrigger};
///
/// assert_eq!(AkiDecision::evaluate(1.5, 0.0).trigger, Some(AkiTrigger::Ratio));
/// assert_eq!(AkiDecision::evaluate(1.2, 26.5).trigger, Some(AkiTrigger::Delta));
/// assert_eq!(AkiDecision::evaluate(1.2, 26.0).label(), AkiLabel::NoAki);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AkiDecision {
    pub trigger: Option<AkiTrigger>,
}

impl AkiDecision {
    #[must_use]
    pub fn evaluate(rv_ratio: f64, delta: f64) -> Self {
        let trigger = if rv_ratio >= RATIO_THRESHOLD {
            Some(AkiTrigger::Ratio)
        } else if delta > DELTA_THRESHOLD {
            Some(AkiTrigger::Delta)
        } else {
            None
        };
        Self { trigger }
    }

    #[must_use]
    pub const fn is_aki(&self) -> bool {
        self.trigger.is_some()
    }

    #[must_use]
    pub const fn label(&self) -> AkiLabel {
        if self.is_aki() {
            AkiLabel::Aki
        } else {
            AkiLabel::NoAki
        }
    }
}
