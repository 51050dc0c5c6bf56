//! Raw CSV tokenization
//!
//! The tokenizer is the boundary to the outside world: it turns file bytes
//! into a header row plus untyped [`RawRow`]s and knows nothing about which
//! columns matter. Anything it cannot read becomes a [`TokenizeError`].

use csv::{ReaderBuilder, Trim};
use thiserror::Error;
use tracing::debug;

use crate::app::models::RawRow;
use crate::constants::HEADER_ROW_NUMBER;

/// Failure to read a file as tabular text
#[derive(Error, Debug)]
pub enum TokenizeError {
    /// The file could not be read at all
    #[error("could not read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The content is not well-formed CSV (bad quoting, invalid UTF-8, ...)
    #[error("{message}")]
    Malformed { line: usize, message: String },

    /// The tokenizer task stopped before producing a result
    #[error("tokenizer task failed: {message}")]
    Aborted { message: String },
}

impl TokenizeError {
    /// Create a malformed-content error from a csv reader failure
    pub fn from_csv(error: csv::Error) -> Self {
        let line = error
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(HEADER_ROW_NUMBER);
        Self::Malformed {
            line,
            message: error.to_string(),
        }
    }

    /// Row number the failure should be reported against
    pub fn row_number(&self) -> usize {
        match self {
            Self::Malformed { line, .. } => *line,
            Self::Read { .. } | Self::Aborted { .. } => HEADER_ROW_NUMBER,
        }
    }
}

/// Tokenizer output: header names and data rows in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Options controlling how raw text is split into rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Drop rows whose every field is blank
    pub skip_empty_lines: bool,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            skip_empty_lines: true,
        }
    }
}

/// Turns raw file bytes into a header row and untyped data rows
pub trait Tokenizer: Send + Sync {
    fn tokenize(
        &self,
        data: &[u8],
        options: TokenizeOptions,
    ) -> Result<TokenizedTable, TokenizeError>;
}

/// Comma-separated tokenizer backed by the `csv` crate
///
/// Records may be shorter or longer than the header row: missing trailing
/// fields are absent from the [`RawRow`], surplus fields are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTokenizer;

impl Tokenizer for CsvTokenizer {
    fn tokenize(
        &self,
        data: &[u8],
        options: TokenizeOptions,
    ) -> Result<TokenizedTable, TokenizeError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::None)
            .from_reader(data);

        let headers: Vec<String> = reader
            .headers()
            .map_err(TokenizeError::from_csv)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result.map_err(TokenizeError::from_csv)?;
            let row = RawRow::from_record(headers.iter().cloned(), record.iter());

            if options.skip_empty_lines && row.is_blank() {
                skipped += 1;
                continue;
            }
            rows.push(row);
        }

        debug!(
            "Tokenized {} columns, {} rows ({} blank rows skipped)",
            headers.len(),
            rows.len(),
            skipped
        );

        Ok(TokenizedTable { headers, rows })
    }
}
