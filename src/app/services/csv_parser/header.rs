//! Required column checks for the header row

use std::collections::HashSet;

use crate::app::models::{ValidationError, normalize_column};

/// Report every required column missing from the observed headers
///
/// Both sides are trimmed and lower-cased before comparison, so the check is
/// order-independent and ignores case and surrounding whitespace. Errors
/// follow the order of `required_columns` and name each column as given.
pub fn validate_headers<H, R>(observed_headers: &[H], required_columns: &[R]) -> Vec<ValidationError>
where
    H: AsRef<str>,
    R: AsRef<str>,
{
    let observed: HashSet<String> = observed_headers
        .iter()
        .map(|header| normalize_column(header.as_ref()))
        .collect();

    required_columns
        .iter()
        .map(|column| column.as_ref())
        .filter(|column| !observed.contains(&normalize_column(column)))
        .map(ValidationError::missing_column)
        .collect()
}
