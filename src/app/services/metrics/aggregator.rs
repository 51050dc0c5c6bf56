//! Mileage aggregation over committed runs
//!
//! Plain floating-point arithmetic throughout: sums accumulate in record
//! order, averages are `total / count`, and nothing is rounded here.

use std::collections::HashMap;

use crate::app::models::{OverallMetrics, PersonMetrics, RunRecord};

/// Running total, extremes and count for a group of runs
#[derive(Debug, Clone, Copy)]
struct MileageSummary {
    total: f64,
    min: f64,
    max: f64,
    count: usize,
}

impl MileageSummary {
    fn new(miles: f64) -> Self {
        Self {
            total: miles,
            min: miles,
            max: miles,
            count: 1,
        }
    }

    fn add(&mut self, miles: f64) {
        self.total += miles;
        self.min = self.min.min(miles);
        self.max = self.max.max(miles);
        self.count += 1;
    }

    fn average(&self) -> f64 {
        self.total / self.count as f64
    }
}

/// Summarize every run; `None` for an empty record set
pub fn overall_metrics(records: &[RunRecord]) -> Option<OverallMetrics> {
    let (first, rest) = records.split_first()?;

    let mut summary = MileageSummary::new(first.miles_run);
    for record in rest {
        summary.add(record.miles_run);
    }

    Some(OverallMetrics {
        total_miles: summary.total,
        average_miles: summary.average(),
        min_miles: summary.min,
        max_miles: summary.max,
        total_runs: summary.count,
        unique_runners: unique_people(records).len(),
    })
}

/// Summarize each runner, highest total mileage first
///
/// Runners with equal totals keep the order in which they first appear in
/// the record set.
pub fn person_metrics(records: &[RunRecord]) -> Vec<PersonMetrics> {
    let mut groups: Vec<(&str, MileageSummary)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match positions.get(record.person.as_str()) {
            Some(&position) => groups[position].1.add(record.miles_run),
            None => {
                positions.insert(record.person.as_str(), groups.len());
                groups.push((record.person.as_str(), MileageSummary::new(record.miles_run)));
            }
        }
    }

    let mut metrics: Vec<PersonMetrics> = groups
        .into_iter()
        .map(|(person, summary)| PersonMetrics {
            person: person.to_string(),
            total_miles: summary.total,
            average_miles: summary.average(),
            min_miles: summary.min,
            max_miles: summary.max,
            runs: summary.count,
        })
        .collect();

    // sort_by is stable, so ties stay in first-appearance order
    metrics.sort_by(|a, b| b.total_miles.total_cmp(&a.total_miles));
    metrics
}

/// Distinct runner names in first-appearance order
pub fn unique_people(records: &[RunRecord]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.person.as_str()))
        .map(|record| record.person.clone())
        .collect()
}
