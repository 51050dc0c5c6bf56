//! Chart series projection
//!
//! A [`ChartSeries`] is a filtered, date-ordered view over borrowed records.
//! Points are rendered lazily on every iteration, so the series can be walked
//! any number of times; a new filter means building a new series.

use chrono::NaiveDate;
use std::fmt::Write;

use crate::app::models::{ChartPoint, PersonFilter, RunRecord};
use crate::constants::DEFAULT_CHART_DATE_FORMAT;

/// Render a date with a `chrono` format string
///
/// Returns `None` when the format cannot be applied to a calendar date, for
/// example an unknown specifier or a time field such as `%H`.
pub fn format_chart_date(date: NaiveDate, date_format: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(date_format)).ok()?;
    Some(rendered)
}

/// Filtered, date-ascending view of a record set
#[derive(Debug, Clone)]
pub struct ChartSeries<'a> {
    records: Vec<&'a RunRecord>,
    date_format: &'a str,
}

impl<'a> ChartSeries<'a> {
    /// Render dates with a different `chrono` format string
    pub fn with_date_format(mut self, date_format: &'a str) -> Self {
        self.date_format = date_format;
        self
    }

    /// Iterate over display points in date order
    pub fn iter(&self) -> impl Iterator<Item = ChartPoint> + '_ {
        self.records.iter().map(|record| ChartPoint {
            // Falls back to ISO 8601 if the format does not fit a date
            date: format_chart_date(record.date, self.date_format)
                .unwrap_or_else(|| record.date.to_string()),
            miles: record.miles_run,
            person: record.person.clone(),
        })
    }

    /// Underlying records in chart order
    pub fn records(&self) -> &[&'a RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Collect the rendered points
    pub fn to_points(&self) -> Vec<ChartPoint> {
        self.iter().collect()
    }
}

/// Build the chart series for the selected runner, or everyone
///
/// The date sort is stable: runs on the same day keep their input order. A
/// filter naming nobody in the set yields an empty series.
pub fn build_series<'a>(records: &'a [RunRecord], filter: &PersonFilter) -> ChartSeries<'a> {
    let mut selected: Vec<&RunRecord> = records
        .iter()
        .filter(|record| filter.matches(&record.person))
        .collect();
    selected.sort_by_key(|record| record.date);

    ChartSeries {
        records: selected,
        date_format: DEFAULT_CHART_DATE_FORMAT,
    }
}
