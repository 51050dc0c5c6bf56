//! Configuration management and validation.
//!
//! Provides the settings that shape ingestion (required columns, blank row
//! handling) and presentation (chart date format, display precision), with
//! defaults, builder methods and optional JSON file loading.

use crate::constants::{
    DEFAULT_CHART_DATE_FORMAT, DEFAULT_DISPLAY_PRECISION, MAX_DISPLAY_PRECISION, REQUIRED_COLUMNS,
};
use crate::app::services::metrics::format_chart_date;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Columns every upload must carry
    pub required_columns: Vec<String>,

    /// Drop rows whose every field is blank before validation
    pub skip_empty_lines: bool,

    /// `chrono` format used to render chart dates
    pub chart_date_format: String,

    /// Decimal places when rendering mileage (presentation only)
    pub precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            required_columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            skip_empty_lines: true,
            chart_date_format: DEFAULT_CHART_DATE_FORMAT.to_string(),
            precision: DEFAULT_DISPLAY_PRECISION,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file; missing keys take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::serialization(format!("Invalid config file {}", path.display()), e)
        })?;

        debug!("Loaded configuration from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Set the required column names
    pub fn with_required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Keep or drop blank rows
    pub fn with_skip_empty_lines(mut self, skip_empty_lines: bool) -> Self {
        self.skip_empty_lines = skip_empty_lines;
        self
    }

    /// Set the chart date display format
    pub fn with_chart_date_format(mut self, format: impl Into<String>) -> Self {
        self.chart_date_format = format.into();
        self
    }

    /// Set the display precision
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.required_columns.is_empty() {
            return Err(Error::configuration(
                "At least one required column must be configured",
            ));
        }

        if self.required_columns.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::configuration("Required column names cannot be blank"));
        }

        if self.chart_date_format.trim().is_empty() {
            return Err(Error::configuration("Chart date format cannot be empty"));
        }

        // Time and offset specifiers parse fine but fail on a plain date
        if format_chart_date(NaiveDate::default(), &self.chart_date_format).is_none() {
            return Err(Error::configuration(format!(
                "Invalid chart date format: '{}' (only date specifiers are allowed)",
                self.chart_date_format
            )));
        }

        if self.precision > MAX_DISPLAY_PRECISION {
            return Err(Error::configuration(format!(
                "Display precision {} exceeds maximum of {}",
                self.precision, MAX_DISPLAY_PRECISION
            )));
        }

        Ok(())
    }
}
