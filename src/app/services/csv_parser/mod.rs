//! CSV ingestion and validation for running activity uploads
//!
//! This module turns untrusted tabular text into either a fully-valid, typed
//! record set or a precise, row-addressable error report. A file is validated
//! and committed as one atomic unit: all rows or none.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`tokenizer`] - Raw CSV tokenization into header names and untyped rows
//! - [`header`] - Required column presence checks
//! - [`field_parsers`] - Per-field parsing for person, date and mileage values
//! - [`row_validator`] - Pluggable per-row validation policy and typed conversion
//! - [`parser`] - Pipeline orchestration: read, tokenize, validate, commit or reject
//!
//! ## Usage
//!
//! ```rust
//! use run_dashboard::app::services::csv_parser::{CsvParser, CsvSource, ParseOptions};
//! use run_dashboard::constants::REQUIRED_COLUMNS;
//!
//! # async fn example() {
//! let parser = CsvParser::new(REQUIRED_COLUMNS.iter().copied());
//! let source = CsvSource::bytes("runs.csv", "date,person,miles run\n2024-01-01,Ann,3\n");
//! let outcome = parser.parse(source, &ParseOptions::default()).await;
//!
//! assert!(outcome.is_valid());
//! # }
//! ```

pub mod field_parsers;
pub mod header;
pub mod parser;
pub mod row_validator;
pub mod tokenizer;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use field_parsers::FieldError;
pub use header::validate_headers;
pub use parser::{CsvParser, CsvSource, ParseOptions};
pub use row_validator::{DefaultRowValidator, RowValidator, record_from_row};
pub use tokenizer::{CsvTokenizer, TokenizeError, TokenizeOptions, TokenizedTable, Tokenizer};
