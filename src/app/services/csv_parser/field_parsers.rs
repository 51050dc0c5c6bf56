//! Field parsing utilities for running activity rows
//!
//! Each parser takes the raw value of one column (absent when the row has no
//! such field) and returns either the typed value or a [`FieldError`] whose
//! `Display` is the user-facing reason.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::constants::{
    ACCEPTED_DATE_FORMATS, ACCEPTED_DATETIME_FORMATS, DATE_COLUMN, MILES_COLUMN, PERSON_COLUMN,
};

/// Why a single field failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("\"{column}\" cannot be empty")]
    Empty { column: &'static str },

    #[error("\"{raw}\" is not a valid date")]
    InvalidDate { raw: String },

    #[error("\"{column}\" must be a number (got \"{raw}\")")]
    NotANumber { column: &'static str, raw: String },

    #[error("\"{column}\" cannot be negative")]
    Negative { column: &'static str },
}

/// Return the trimmed value, or `None` if absent or blank
fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse the `person` field into a trimmed, non-empty name
pub fn parse_person(raw: Option<&str>) -> Result<String, FieldError> {
    non_blank(raw)
        .map(str::to_string)
        .ok_or(FieldError::Empty {
            column: PERSON_COLUMN,
        })
}

/// Parse the `date` field as a calendar date
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate, FieldError> {
    let value = non_blank(raw).ok_or(FieldError::Empty {
        column: DATE_COLUMN,
    })?;

    parse_calendar_date(value).ok_or_else(|| FieldError::InvalidDate {
        raw: raw.unwrap_or_default().to_string(),
    })
}

/// Parse the `miles run` field as a finite, non-negative distance
///
/// Zero is valid. `inf` and `NaN` are rejected as non-numbers.
pub fn parse_miles(raw: Option<&str>) -> Result<f64, FieldError> {
    let value = non_blank(raw).ok_or(FieldError::Empty {
        column: MILES_COLUMN,
    })?;

    let miles = value
        .parse::<f64>()
        .ok()
        .filter(|miles| miles.is_finite())
        .ok_or_else(|| FieldError::NotANumber {
            column: MILES_COLUMN,
            raw: raw.unwrap_or_default().to_string(),
        })?;

    if miles < 0.0 {
        return Err(FieldError::Negative {
            column: MILES_COLUMN,
        });
    }

    // -0 parses fine but should never surface as "-0"
    Ok(if miles == 0.0 { 0.0 } else { miles })
}

/// Recognise a standard calendar date, with or without a time part
///
/// Accepts ISO dates, slash and dash separated dates, month-name dates,
/// ISO date-times and RFC 3339 / RFC 2822 timestamps. Only the calendar date
/// is kept; timestamps with an offset keep their local date.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Some(date) = ACCEPTED_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    {
        return Some(date);
    }

    if let Some(date_time) = ACCEPTED_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(date_time.date());
    }

    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
        .map(|date_time| date_time.date_naive())
}
