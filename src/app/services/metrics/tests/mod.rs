//! Test utilities for metrics aggregation and chart series

use chrono::NaiveDate;

use crate::app::models::RunRecord;


/// Helper to build a record from an ISO date
pub fn run(date: &str, person: &str, miles: f64) -> RunRecord {
    RunRecord {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        person: person.to_string(),
        miles_run: miles,
    }
}

/// Helper to create a small multi-runner record set, deliberately out of date order
pub fn sample_records() -> Vec<RunRecord> {
    vec![
        run("2024-01-03", "Alice", 3.0),
        run("2024-01-01", "Bob", 5.0),
        run("2024-01-02", "Alice", 4.5),
        run("2024-01-01", "Cara", 2.0),
        run("2024-01-02", "Bob", 1.0),
    ]
}
