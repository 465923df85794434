//! Serum creatinine reference intervals by age and sex.
//!
//! Values are in µmol/L. The intervals describe the normal population range
//! and are not part of the AKI decision rule.

use serde::{Deserialize, Serialize};

use crate::Sex;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ReferenceInterval {
    const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Returns `true` if `value` lies within the interval (inclusive).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

#[derive(Debug)]
struct AgeBand {
    min_age: u32,
    male: ReferenceInterval,
    female: ReferenceInterval,
}

impl AgeBand {
    const fn both(min_age: u32, low: f64, high: f64) -> Self {
        Self {
            min_age,
            male: ReferenceInterval::new(low, high),
            female: ReferenceInterval::new(low, high),
        }
    }

    const fn split(min_age: u32, male: (f64, f64), female: (f64, f64)) -> Self {
        Self {
            min_age,
            male: ReferenceInterval::new(male.0, male.1),
            female: ReferenceInterval::new(female.0, female.1),
        }
    }
}

// Sorted by `min_age`; the first band must start at 0.
static AGE_BANDS: [AgeBand; 10] = [
    AgeBand::both(0, 14.0, 34.0),
    AgeBand::both(1, 15.0, 31.0),
    AgeBand::both(3, 23.0, 37.0),
    AgeBand::both(5, 25.0, 42.0),
    AgeBand::both(7, 30.0, 47.0),
    AgeBand::both(9, 29.0, 56.0),
    AgeBand::both(11, 39.0, 60.0),
    AgeBand::both(13, 40.0, 72.0),
    AgeBand::split(15, (47.0, 98.0), (39.0, 76.0)),
    AgeBand::split(18, (59.0, 104.0), (45.0, 84.0)),
];

/// Looks up the reference interval for a patient's age and sex.
///
/// # Examples
///
/// ```
/// use akiscan_engine::{Sex, reference_interval};
///
/// let adult_male = reference_interval::lookup(45, Sex::Male);
/// assert_eq!((adult_male.low, adult_male.high), (59.0, 104.0));
/// assert!(adult_male.contains(80.0));
/// ```
#[must_use]
pub fn lookup(age: u32, sex: Sex) -> ReferenceInterval {
    let index = AGE_BANDS.partition_point(|band| band.min_age <= age);
    let band = &AGE_BANDS[index.saturating_sub(1)];
    match sex {
        Sex::Male => band.male,
        Sex::Female => band.female,
    }
}
