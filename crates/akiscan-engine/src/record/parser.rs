//! Raw row parsing.
//!
//! A raw row is a flat sequence of fields:
//!
//! ```text
//! age, sex, [label], date_0, result_0, date_1, result_1, ...
//! ```
//!
//! Rows from a batch are padded to the width of the longest patient history,
//! so trailing empty slots are expected and discarded. Test rows may also be
//! training rows with the label still in place; in test mode every empty field
//! and every label token is stripped before the layout is reconstructed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{AkiLabel, LabelTokens, Measurement, Mode, PatientRecord, RecordLayout, Sex};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    #[display("record is missing the {field} field")]
    MissingField { field: &'static str },
    #[display("invalid age '{value}'")]
    InvalidAge { value: String },
    #[display("unrecognized sex '{value}'")]
    InvalidSex { value: String },
    #[display("unpaired creatinine field '{value}' at position {position}")]
    UnpairedField { position: usize, value: String },
    #[display("invalid creatinine date '{value}' at position {position}")]
    InvalidDate { position: usize, value: String },
    #[display("invalid creatinine result '{value}' at position {position}")]
    InvalidResult { position: usize, value: String },
}

/// Converts raw rows into [`PatientRecord`]s.
///
/// # Examples
///
/// ```
/// use akiscan_engine::{AkiLabel, Mode, RecordParser, Sex};
///
/// let parser = RecordParser::default();
/// let row = ["54", "m", "y", "2024-01-01 09:30:00", "95.0", "2024-01-03 10:00:00", "160.5", "", ""];
/// let record = parser.parse(&row, Mode::Train)?;
///
/// assert_eq!(record.age(), 54);
/// assert_eq!(record.sex(), Sex::Male);
/// assert_eq!(record.label(), Some(AkiLabel::Aki));
/// assert_eq!(record.measurements().len(), 2);
/// # Ok::<(), akiscan_engine::ParseError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    tokens: LabelTokens,
}

impl RecordParser {
    #[must_use]
    pub fn new(tokens: LabelTokens) -> Self {
        Self { tokens }
    }

    #[must_use]
    pub fn tokens(&self) -> &LabelTokens {
        &self.tokens
    }

    /// Parses one raw row.
    ///
    /// The returned record carries a label iff `mode` is [`Mode::Train`].
    /// Measurements keep the order of the row.
    pub fn parse<S>(&self, fields: &[S], mode: Mode) -> Result<PatientRecord, ParseError>
    where
        S: AsRef<str>,
    {
        let fields = self.clean_fields(fields, mode);
        let layout = RecordLayout::new(fields.len(), mode);

        let age = fields
            .get(RecordLayout::AGE_INDEX)
            .ok_or(ParseError::MissingField { field: "age" })?;
        let age = age.parse::<u32>().map_err(|_| ParseError::InvalidAge {
            value: (*age).to_owned(),
        })?;

        let sex = fields
            .get(RecordLayout::SEX_INDEX)
            .ok_or(ParseError::MissingField { field: "sex" })?;
        let sex = Sex::from_token(sex).ok_or_else(|| ParseError::InvalidSex {
            value: (*sex).to_owned(),
        })?;

        let label = match mode {
            Mode::Train => {
                let token = fields
                    .get(RecordLayout::LABEL_INDEX)
                    .ok_or(ParseError::MissingField { field: "label" })?;
                Some(AkiLabel::from_token(token, &self.tokens))
            }
            Mode::Test => None,
        };

        if let Some(position) = layout.unpaired_index() {
            return Err(ParseError::UnpairedField {
                position,
                value: fields[position].to_owned(),
            });
        }

        let offset = layout.measurement_offset();
        let measurements = fields
            .get(offset..)
            .unwrap_or_default()
            .chunks_exact(2)
            .enumerate()
            .map(|(i, pair)| parse_measurement(offset + i * 2, pair[0], pair[1]))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PatientRecord::new(age, sex, label, measurements))
    }

    fn clean_fields<'a, S>(&self, fields: &'a [S], mode: Mode) -> Vec<&'a str>
    where
        S: AsRef<str>,
    {
        let fields = fields.iter().map(|f| f.as_ref().trim());
        match mode {
            Mode::Test => fields
                .filter(|f| !f.is_empty() && !self.tokens.is_label_token(f))
                .collect(),
            Mode::Train => {
                let mut fields = fields.collect::<Vec<_>>();
                // keep the label slot even if it is empty
                let keep = fields
                    .iter()
                    .rposition(|f| !f.is_empty())
                    .map_or(0, |last| last + 1)
                    .max(RecordLayout::LABEL_INDEX + 1)
                    .min(fields.len());
                fields.truncate(keep);
                fields
            }
        }
    }
}

fn parse_measurement(position: usize, date: &str, result: &str) -> Result<Measurement, ParseError> {
    let date = parse_timestamp(date).ok_or_else(|| ParseError::InvalidDate {
        position,
        value: date.to_owned(),
    })?;
    let result = result
        .parse::<f64>()
        .ok()
        .filter(|r| Measurement::is_valid_result(*r))
        .ok_or_else(|| ParseError::InvalidResult {
            position: position + 1,
            value: result.to_owned(),
        })?;
    Ok(Measurement::new(date, result))
}

/// Parses a creatinine test timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS[.fff]]` (space or `T` separated), a bare
/// `YYYY-MM-DD` (midnight) and RFC 3339 timestamps, which are converted to UTC.
///
/// # Examples
///
/// ```
/// use akiscan_engine::parse_timestamp;
///
/// assert!(parse_timestamp("2024-02-29 23:15:00").is_some());
/// assert!(parse_timestamp("2024-02-29").is_some());
/// assert!(parse_timestamp("2024-02-30").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
