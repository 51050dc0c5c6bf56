//! Per-row validation policy and typed record conversion
//!
//! A [`RowValidator`] decides which field-level problems a row has. The
//! orchestrator accepts any implementation, including plain closures, so a
//! caller can swap the policy without touching the pipeline.

use crate::app::models::{RawRow, RunRecord, ValidationError};
use crate::constants::{DATE_COLUMN, MILES_COLUMN, PERSON_COLUMN};

use super::field_parsers::{FieldError, parse_date, parse_miles, parse_person};

/// Validation policy applied to each data row
///
/// `row_index` is the 0-based position among data rows; errors should be
/// built with [`ValidationError::row`] so they report `row_index + 2`.
pub trait RowValidator: Send + Sync {
    fn validate_row(&self, row: &RawRow, row_index: usize) -> Vec<ValidationError>;
}

impl<F> RowValidator for F
where
    F: Fn(&RawRow, usize) -> Vec<ValidationError> + Send + Sync,
{
    fn validate_row(&self, row: &RawRow, row_index: usize) -> Vec<ValidationError> {
        self(row, row_index)
    }
}

/// Default policy: non-empty person, calendar date, non-negative mileage
///
/// Every check runs independently so one row can report several problems,
/// in column order person, date, miles run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRowValidator;

impl RowValidator for DefaultRowValidator {
    fn validate_row(&self, row: &RawRow, row_index: usize) -> Vec<ValidationError> {
        let checks: [Option<FieldError>; 3] = [
            parse_person(row.get(PERSON_COLUMN)).err(),
            parse_date(row.get(DATE_COLUMN)).err(),
            parse_miles(row.get(MILES_COLUMN)).err(),
        ];

        checks
            .into_iter()
            .flatten()
            .map(|error| ValidationError::row(row_index, error.to_string()))
            .collect()
    }
}

/// Convert a raw row into a typed record
///
/// Total over its input: either every field parses, or every failing field is
/// reported. Used at commit time so a lenient custom validator can never let
/// an untyped row into the committed set.
pub fn record_from_row(row: &RawRow, row_index: usize) -> Result<RunRecord, Vec<ValidationError>> {
    let person = parse_person(row.get(PERSON_COLUMN));
    let date = parse_date(row.get(DATE_COLUMN));
    let miles_run = parse_miles(row.get(MILES_COLUMN));

    match (person, date, miles_run) {
        (Ok(person), Ok(date), Ok(miles_run)) => Ok(RunRecord {
            date,
            person,
            miles_run,
        }),
        (person, date, miles_run) => Err([person.err(), date.err(), miles_run.err()]
            .into_iter()
            .flatten()
            .map(|error| ValidationError::row(row_index, error.to_string()))
            .collect()),
    }
}
