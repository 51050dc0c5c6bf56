//! Derived statistics and chart series for a committed record set
//!
//! Everything here is a pure function of an immutable record slice, so results
//! can be recomputed at any time without locking:
//! - [`aggregator`] - Overall and per-person mileage statistics
//! - [`chart`] - Date-ordered, person-filtered chart projection

pub mod aggregator;
pub mod chart;

#[cfg(test)]
pub mod tests;

// Re-export main functions for easy access
pub use aggregator::{overall_metrics, person_metrics, unique_people};
pub use chart::{ChartSeries, build_series, format_chart_date};
