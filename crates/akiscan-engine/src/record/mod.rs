//! Patient record domain model and raw-row parsing.
//!
//! - [`Measurement`] - One dated creatinine result
//! - [`PatientRecord`] - Demographics, optional label and the ordered creatinine history
//! - [`RecordLayout`] - Column positions implied by a row's field count and [`Mode`]
//! - [`RecordParser`] - Converts a flat row of raw fields into a [`PatientRecord`]

pub use self::{layout::*, measurement::*, parser::*, patient::*};

mod layout;
mod measurement;
mod parser;
mod patient;
