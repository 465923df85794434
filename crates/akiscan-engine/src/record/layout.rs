use serde::{Deserialize, Serialize};

/// Whether a row carries a ground-truth label.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Rows are `age, sex, label, date, result, ...`.
    #[display("train")]
    Train,
    /// Rows are `age, sex, date, result, ...`.
    #[default]
    #[display("test")]
    Test,
}

/// Column positions implied by a row's field count and [`Mode`].
///
/// The first two columns are always age and sex. Training rows carry the
/// label in the third column. All remaining columns alternate between a test
/// date and its result.
///
/// # Examples
///
/// ```
/// use akiscan_engine::{Mode, RecordLayout};
///
/// let layout = RecordLayout::new(7, Mode::Train);
/// assert_eq!(layout.measurement_offset(), 3);
/// assert_eq!(layout.pair_count(), 2);
/// assert_eq!(
///     layout.column_names(),
///     [
///         "age",
///         "sex",
///         "aki",
///         "creatinine_date_0",
///         "creatinine_result_0",
///         "creatinine_date_1",
///         "creatinine_result_1",
///     ]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    field_count: usize,
    mode: Mode,
}

impl RecordLayout {
    pub const AGE_INDEX: usize = 0;
    pub const SEX_INDEX: usize = 1;
    pub const LABEL_INDEX: usize = 2;

    #[must_use]
    pub const fn new(field_count: usize, mode: Mode) -> Self {
        Self { field_count, mode }
    }

    #[must_use]
    pub const fn field_count(&self) -> usize {
        self.field_count
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the first creatinine date column.
    #[must_use]
    pub const fn measurement_offset(&self) -> usize {
        match self.mode {
            Mode::Train => Self::LABEL_INDEX + 1,
            Mode::Test => Self::LABEL_INDEX,
        }
    }

    /// Number of complete (date, result) column pairs.
    #[must_use]
    pub const fn pair_count(&self) -> usize {
        self.field_count.saturating_sub(self.measurement_offset()) / 2
    }

    /// Index of a trailing date without a result, if any.
    #[must_use]
    pub const fn unpaired_index(&self) -> Option<usize> {
        let offset = self.measurement_offset();
        if self.field_count > offset && (self.field_count - offset) % 2 == 1 {
            Some(self.field_count - 1)
        } else {
            None
        }
    }

    /// Header names for every named column of this layout.
    ///
    /// A trailing unpaired column has no name and is not included.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec!["age".to_owned(), "sex".to_owned()];
        if self.mode.is_train() {
            names.push("aki".to_owned());
        }
        for i in 0..self.pair_count() {
            names.push(format!("creatinine_date_{i}"));
            names.push(format!("creatinine_result_{i}"));
        }
        names.truncate(self.field_count.max(Self::SEX_INDEX + 1));
        names
    }
}
