//! Parse pipeline orchestration
//!
//! This module drives one upload end to end: read the source, tokenize it,
//! check headers, validate every row, then commit all records or reject the
//! file with the full error list. Every failure path settles as a
//! [`ParseOutcome`]; nothing here returns `Err`.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::header::validate_headers;
use super::row_validator::{DefaultRowValidator, RowValidator, record_from_row};
use super::tokenizer::{CsvTokenizer, TokenizeError, TokenizeOptions, TokenizedTable, Tokenizer};
use crate::app::models::{ParseOutcome, ValidationError};

/// Where an upload comes from
#[derive(Debug, Clone)]
pub enum CsvSource {
    /// A file on disk, read asynchronously
    Path(PathBuf),
    /// Content already in memory, with a display name
    Bytes { name: String, data: Vec<u8> },
}

impl CsvSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Display name of the upload (file name for paths)
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Bytes { name, .. } => name.clone(),
        }
    }

    async fn read(self) -> Result<Vec<u8>, TokenizeError> {
        match self {
            Self::Path(path) => tokio::fs::read(&path)
                .await
                .map_err(|source| TokenizeError::Read {
                    name: path.display().to_string(),
                    source,
                }),
            Self::Bytes { data, .. } => Ok(data),
        }
    }
}

/// Per-call parse settings
#[derive(Clone)]
pub struct ParseOptions {
    /// Row policy; [`DefaultRowValidator`] when `None`
    pub row_validator: Option<Arc<dyn RowValidator>>,

    /// Drop rows whose every field is blank before validation
    pub skip_empty_lines: bool,
}

impl ParseOptions {
    pub fn with_row_validator(mut self, validator: impl RowValidator + 'static) -> Self {
        self.row_validator = Some(Arc::new(validator));
        self
    }

    pub fn with_skip_empty_lines(mut self, skip_empty_lines: bool) -> Self {
        self.skip_empty_lines = skip_empty_lines;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            row_validator: None,
            skip_empty_lines: true,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("custom_row_validator", &self.row_validator.is_some())
            .field("skip_empty_lines", &self.skip_empty_lines)
            .finish()
    }
}

/// Stateless parse pipeline for running activity files
///
/// Holds the required column set and the tokenizer; session state and
/// superseded-call handling live in [`crate::app::session::SessionStore`].
#[derive(Clone)]
pub struct CsvParser {
    required_columns: Vec<String>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl fmt::Debug for CsvParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvParser")
            .field("required_columns", &self.required_columns)
            .finish_non_exhaustive()
    }
}

impl CsvParser {
    /// Create a parser requiring the given columns, using the CSV tokenizer
    pub fn new<I, S>(required_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_columns: required_columns.into_iter().map(Into::into).collect(),
            tokenizer: Arc::new(CsvTokenizer),
        }
    }

    /// Replace the tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required_columns
    }

    /// Parse one upload into a committed or rejected outcome
    ///
    /// Suspends only while reading and tokenizing; validation runs
    /// synchronously on the tokenized table.
    pub async fn parse(&self, source: CsvSource, options: &ParseOptions) -> ParseOutcome {
        let name = source.name();
        info!("Parsing CSV upload: {}", name);

        let table = match self.tokenize(source, options).await {
            Ok(table) => table,
            Err(e) => {
                warn!("Tokenizing {} failed: {}", name, e);
                return ParseOutcome::rejected(vec![ValidationError::tokenization(
                    e.row_number(),
                    &e,
                )]);
            }
        };

        let outcome = match &options.row_validator {
            Some(validator) => self.validate_table(&table, validator.as_ref()),
            None => self.validate_table(&table, &DefaultRowValidator),
        };

        match &outcome {
            ParseOutcome::Committed { records } => {
                info!("Committed {} records from {}", records.len(), name)
            }
            ParseOutcome::Rejected { errors } => {
                info!("Rejected {} with {} errors", name, errors.len())
            }
        }
        outcome
    }

    async fn tokenize(
        &self,
        source: CsvSource,
        options: &ParseOptions,
    ) -> Result<TokenizedTable, TokenizeError> {
        let data = source.read().await?;
        let tokenizer = Arc::clone(&self.tokenizer);
        let tokenize_options = TokenizeOptions {
            skip_empty_lines: options.skip_empty_lines,
        };

        tokio::task::spawn_blocking(move || tokenizer.tokenize(&data, tokenize_options))
            .await
            .map_err(|e| TokenizeError::Aborted {
                message: e.to_string(),
            })?
    }

    /// Validate a tokenized table and decide commit or reject
    ///
    /// Header errors fail fast and are never mixed with row errors. Row
    /// errors are accumulated across every row in row order.
    pub fn validate_table(
        &self,
        table: &TokenizedTable,
        validator: &dyn RowValidator,
    ) -> ParseOutcome {
        let header_errors = validate_headers(&table.headers, &self.required_columns);
        if !header_errors.is_empty() {
            debug!("Header check failed: {} missing columns", header_errors.len());
            return ParseOutcome::rejected(header_errors);
        }

        let row_errors: Vec<ValidationError> = table
            .rows
            .iter()
            .enumerate()
            .flat_map(|(index, row)| validator.validate_row(row, index))
            .collect();

        if !row_errors.is_empty() {
            debug!(
                "Row validation failed: {} errors across {} rows",
                row_errors.len(),
                table.rows.len()
            );
            return ParseOutcome::rejected(row_errors);
        }

        let mut records = Vec::with_capacity(table.rows.len());
        let mut conversion_errors = Vec::new();
        for (index, row) in table.rows.iter().enumerate() {
            match record_from_row(row, index) {
                Ok(record) => records.push(record),
                Err(errors) => conversion_errors.extend(errors),
            }
        }

        if conversion_errors.is_empty() {
            ParseOutcome::committed(records)
        } else {
            debug!(
                "{} rows passed the row policy but could not be typed",
                conversion_errors.len()
            );
            ParseOutcome::rejected(conversion_errors)
        }
    }
}
