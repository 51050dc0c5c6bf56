//! Run Dashboard Library
//!
//! A Rust library for turning user-supplied running activity CSV files
//! (date, person, miles run) into validated records and derived statistics.
//!
//! This library provides tools for:
//! - Tokenizing uploads and checking required columns case-insensitively
//! - Validating every row with a pluggable policy and reporting each problem by row number
//! - Committing a file atomically: all rows or none
//! - Computing overall and per-runner mileage statistics
//! - Building date-ordered, person-filtered chart series
//! - Holding session state as immutable snapshots with stale-result protection

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod session;
    pub mod services {
        pub mod csv_parser;
        pub mod metrics;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ChartPoint, OverallMetrics, ParseOutcome, ParseState, PersonFilter, PersonMetrics, RawRow,
    RunRecord, ValidationError, ValidationErrorKind,
};
pub use app::session::{Session, SessionStore};
pub use config::Config;

/// Result type alias for the run dashboard
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for operations outside the validation report
///
/// Problems with an uploaded file are never errors here: they settle as a
/// rejected [`ParseOutcome`]. These variants cover configuration, I/O on
/// non-upload files, and output rendering.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON encoding or decoding failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}
