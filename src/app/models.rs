//! Data models for running activity ingestion
//!
//! This module contains the core data structures moving through the pipeline:
//! untyped [`RawRow`]s from the tokenizer, validated [`RunRecord`]s, the
//! row-addressable [`ValidationError`]s reported on failure, and the derived
//! metrics and chart values handed to the presentation layer.

use crate::constants::{ALL_PEOPLE, DATA_ROW_OFFSET, HEADER_ROW_NUMBER, TOKENIZE_ERROR_PREFIX};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Normalize a column name for comparison (trimmed, lower-cased)
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Raw Input
// =============================================================================

/// One data row as produced by the tokenizer, before any validation
///
/// Fields keep their original header spelling and file order. Lookups go
/// through [`RawRow::get`], which applies the same trim/lower-case
/// normalization as header validation, so `" Miles Run "` answers to
/// `"miles run"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row by zipping header names with field values
    ///
    /// Values beyond the header count are dropped; headers without a value
    /// are simply absent from the row.
    pub fn from_record<H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let fields = headers
            .into_iter()
            .zip(values)
            .map(|(header, value)| (header.into(), value.into()))
            .collect();
        Self { fields }
    }

    /// Append a field, keeping insertion order
    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((column.into(), value.into()));
        self
    }

    /// Get the raw value of a column; the first matching header wins on duplicates
    pub fn get(&self, column: &str) -> Option<&str> {
        let wanted = normalize_column(column);
        self.fields
            .iter()
            .find(|(name, _)| normalize_column(name) == wanted)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether every field is blank after trimming
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.trim().is_empty())
    }

    /// Number of fields carried by the row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(column, value)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

// =============================================================================
// Validated Records
// =============================================================================

/// One validated run: who ran, when, and how far
///
/// Only created once every field has passed validation. Identity is the
/// record's position in the committed sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Calendar date of the run
    pub date: NaiveDate,

    /// Runner's name, trimmed and never empty
    pub person: String,

    /// Distance in miles, finite and never negative
    pub miles_run: f64,
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Which stage of the pipeline produced a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// A required column is missing; fails the whole file on its own
    Header,
    /// A field-level defect in one data row
    Row,
    /// The file could not be read as tabular text at all
    Tokenization,
}

/// A single user-facing problem with an uploaded file
///
/// `row_number` is 1-based and counts the header as row 1, so the first data
/// row is row 2. Row errors render as `Row <n>: <message>`; header and
/// tokenization errors render as their bare message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub row_number: usize,
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    /// Error for a required column that is absent from the header row
    pub fn missing_column(column: &str) -> Self {
        Self {
            row_number: HEADER_ROW_NUMBER,
            kind: ValidationErrorKind::Header,
            message: format!("Missing required column: \"{}\"", column),
        }
    }

    /// Error for a defective data row, addressed by its 0-based data index
    pub fn row(row_index: usize, message: impl Into<String>) -> Self {
        Self {
            row_number: row_index + DATA_ROW_OFFSET,
            kind: ValidationErrorKind::Row,
            message: message.into(),
        }
    }

    /// Synthetic error standing in for a tokenizer failure
    pub fn tokenization(row_number: usize, detail: impl fmt::Display) -> Self {
        Self {
            row_number,
            kind: ValidationErrorKind::Tokenization,
            message: format!("{}: {}", TOKENIZE_ERROR_PREFIX, detail),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValidationErrorKind::Row => write!(f, "Row {}: {}", self.row_number, self.message),
            ValidationErrorKind::Header | ValidationErrorKind::Tokenization => {
                f.write_str(&self.message)
            }
        }
    }
}

// =============================================================================
// Parse Results
// =============================================================================

/// Result of one parse attempt: the whole file is committed or rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ParseOutcome {
    /// Every row validated; records are in file order (possibly empty)
    Committed { records: Arc<[RunRecord]> },
    /// At least one problem; nothing was committed
    Rejected { errors: Vec<ValidationError> },
}

impl ParseOutcome {
    /// Build a committed outcome from validated records
    pub fn committed(records: Vec<RunRecord>) -> Self {
        Self::Committed {
            records: records.into(),
        }
    }

    /// Build a rejected outcome; an empty error list is a programming error
    pub fn rejected(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty(), "rejected outcome needs an error");
        Self::Rejected { errors }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// Committed records, if any
    pub fn records(&self) -> Option<&[RunRecord]> {
        match self {
            Self::Committed { records } => Some(records),
            Self::Rejected { .. } => None,
        }
    }

    /// Reported errors; empty for a committed outcome
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Self::Committed { .. } => &[],
            Self::Rejected { errors } => errors,
        }
    }
}

/// Lifecycle state of the parse orchestrator for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParseState::Idle => "idle",
            ParseState::Loading => "loading",
            ParseState::Success => "success",
            ParseState::Failed => "failed",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Person Filter
// =============================================================================

/// Chart selection: every runner, or one named runner
///
/// The string conversion treats `"all"` as everyone, so a runner literally
/// named `all` is only reachable by building [`PersonFilter::Person`]
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PersonFilter {
    #[default]
    All,
    Person(String),
}

impl PersonFilter {
    /// Check whether a record's person passes the filter
    pub fn matches(&self, person: &str) -> bool {
        match self {
            PersonFilter::All => true,
            PersonFilter::Person(selected) => selected == person,
        }
    }
}

impl From<&str> for PersonFilter {
    /// `"all"` selects everyone; anything else names one runner
    fn from(value: &str) -> Self {
        if value == ALL_PEOPLE {
            PersonFilter::All
        } else {
            PersonFilter::Person(value.to_string())
        }
    }
}

impl fmt::Display for PersonFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonFilter::All => f.write_str(ALL_PEOPLE),
            PersonFilter::Person(name) => f.write_str(name),
        }
    }
}

// =============================================================================
// Derived Metrics
// =============================================================================

/// Summary statistics across every committed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallMetrics {
    pub total_miles: f64,
    pub average_miles: f64,
    pub min_miles: f64,
    pub max_miles: f64,
    pub total_runs: usize,
    pub unique_runners: usize,
}

/// Summary statistics for one runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonMetrics {
    pub person: String,
    pub total_miles: f64,
    pub average_miles: f64,
    pub min_miles: f64,
    pub max_miles: f64,
    pub runs: usize,
}

/// One point of the mileage-over-time chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Run date rendered for display
    pub date: String,
    pub miles: f64,
    pub person: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_row_lookup_is_normalized() {
        let row = RawRow::from_record([" Date", "PERSON ", " Miles Run "], ["2024-01-01", "Ann", "3"]);

        assert_eq!(row.get("date"), Some("2024-01-01"));
        assert_eq!(row.get("person"), Some("Ann"));
        assert_eq!(row.get("miles run"), Some("3"));
        assert_eq!(row.get("pace"), None);
    }

    #[test]
    fn test_raw_row_duplicate_headers_first_wins() {
        let row = RawRow::new()
            .with_field("person", "First")
            .with_field("Person", "Second");

        assert_eq!(row.get("person"), Some("First"));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_raw_row_short_record_leaves_columns_absent() {
        let row = RawRow::from_record(["date", "person", "miles run"], ["2024-01-01"]);

        assert_eq!(row.len(), 1);
        assert_eq!(row.get("person"), None);
    }

    #[test]
    fn test_raw_row_is_blank() {
        assert!(RawRow::from_record(["a", "b"], ["", "  "]).is_blank());
        assert!(!RawRow::from_record(["a", "b"], ["", "x"]).is_blank());
    }

    #[test]
    fn test_validation_error_display() {
        let header = ValidationError::missing_column("miles run");
        assert_eq!(header.row_number, 1);
        assert_eq!(header.to_string(), "Missing required column: \"miles run\"");

        let row = ValidationError::row(1, "\"miles run\" cannot be negative");
        assert_eq!(row.row_number, 3);
        assert_eq!(row.to_string(), "Row 3: \"miles run\" cannot be negative");

        let tokenize = ValidationError::tokenization(1, "stream did not contain valid UTF-8");
        assert_eq!(
            tokenize.to_string(),
            "Failed to parse CSV: stream did not contain valid UTF-8"
        );
    }

    #[test]
    fn test_parse_outcome_accessors() {
        let committed = ParseOutcome::committed(Vec::new());
        assert!(committed.is_valid());
        assert_eq!(committed.records().map(<[RunRecord]>::len), Some(0));
        assert!(committed.errors().is_empty());

        let rejected = ParseOutcome::rejected(vec![ValidationError::missing_column("date")]);
        assert!(!rejected.is_valid());
        assert!(rejected.records().is_none());
        assert_eq!(rejected.errors().len(), 1);
    }

    #[test]
    fn test_person_filter_from_str() {
        assert_eq!(PersonFilter::from("all"), PersonFilter::All);
        assert_eq!(
            PersonFilter::from("Ann"),
            PersonFilter::Person("Ann".to_string())
        );
        assert!(PersonFilter::All.matches("anyone"));
        assert!(!PersonFilter::Person("Ann".to_string()).matches("Bob"));
    }

    #[test]
    fn test_person_filter_for_runner_named_all() {
        let filter = PersonFilter::Person("all".to_string());

        assert!(filter.matches("all"));
        assert!(!filter.matches("Ann"));
        assert_ne!(filter, PersonFilter::All);
    }

    #[test]
    fn test_validation_error_json_is_camel_case() {
        let error = ValidationError::row(0, "\"person\" cannot be empty");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["rowNumber"], 2);
        assert_eq!(json["kind"], "row");
        assert_eq!(json["message"], "\"person\" cannot be empty");
        assert_eq!(serde_json::from_value::<ValidationError>(json).unwrap(), error);
    }
}
