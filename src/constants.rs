//! Application constants for the run dashboard
//!
//! This module contains the column names, filter tokens, default values and
//! display formats used throughout the ingestion pipeline and CLI.

// =============================================================================
// Input File Columns
// =============================================================================

/// Column holding the calendar date of a run
pub const DATE_COLUMN: &str = "date";

/// Column holding the runner's name
pub const PERSON_COLUMN: &str = "person";

/// Column holding the distance covered, in miles
pub const MILES_COLUMN: &str = "miles run";

/// Columns every uploaded file must carry (case and whitespace insensitive)
pub const REQUIRED_COLUMNS: &[&str] = &[DATE_COLUMN, PERSON_COLUMN, MILES_COLUMN];

// =============================================================================
// Row Numbering
// =============================================================================

/// Row number of the header line as reported to users
pub const HEADER_ROW_NUMBER: usize = 1;

/// Offset added to a 0-based data row index to get its user-facing row number
///
/// One for the header row, one for 1-based counting.
pub const DATA_ROW_OFFSET: usize = 2;

// =============================================================================
// Person Filter
// =============================================================================

/// Filter token selecting every runner in the chart series
pub const ALL_PEOPLE: &str = "all";

// =============================================================================
// Date Handling
// =============================================================================

/// Calendar date formats recognised in the `date` column, tried in order
pub const ACCEPTED_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Date-time formats whose date part is accepted in the `date` column
pub const ACCEPTED_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Default display format for chart dates (en-US short date, no zero padding)
pub const DEFAULT_CHART_DATE_FORMAT: &str = "%-m/%-d/%Y";

// =============================================================================
// Presentation Defaults
// =============================================================================

/// Decimal places used when the CLI renders mileage figures
pub const DEFAULT_DISPLAY_PRECISION: usize = 2;

/// Upper bound accepted for the display precision setting
pub const MAX_DISPLAY_PRECISION: usize = 10;

/// Prefix of the synthetic error reported when the tokenizer fails
pub const TOKENIZE_ERROR_PREFIX: &str = "Failed to parse CSV";

// =============================================================================
// Logging Defaults
// =============================================================================

/// Default log level when neither `RUST_LOG` nor `--verbose` is given
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log target used to build the default `EnvFilter` directive
pub const LOG_TARGET: &str = "run_dashboard";
