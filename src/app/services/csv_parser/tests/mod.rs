//! Test utilities for running activity CSV parsing
//!
//! Shared fixtures and helpers used across the parser test modules.

use std::io::Write;
use tempfile::NamedTempFile;

use crate::app::models::RawRow;


/// Helper to build a raw row with the standard columns
pub fn raw_row(date: &str, person: &str, miles: &str) -> RawRow {
    RawRow::from_record(["date", "person", "miles run"], [date, person, miles])
}

/// Helper to create a valid upload with three runs by two people
pub fn create_valid_csv() -> String {
    "date,person,miles run\n\
     2024-01-01,Alice,3\n\
     2024-01-02,Bob,5.5\n\
     2024-01-03,Alice,4\n"
        .to_string()
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
