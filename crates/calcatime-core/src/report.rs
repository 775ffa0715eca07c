//! Report rows handed to the renderers.

use serde::Serialize;

use crate::grouping::Totals;
use crate::timespan::DateInterval;

/// One output record per surviving group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Interval start as `YYYY-MM-DD`.
    pub start: String,
    /// Interval end (exclusive) as `YYYY-MM-DD`.
    pub end: String,
    pub group: String,
    /// Total hours.
    pub duration: f64,
}

/// Builds report rows in grouping order, dropping zero totals unless `include_zero`.
pub fn build_rows(interval: &DateInterval, totals: &Totals, include_zero: bool) -> Vec<ReportRow> {
    let start = interval.start().format("%Y-%m-%d").to_string();
    let end = interval.end().format("%Y-%m-%d").to_string();

    totals
        .iter()
        .filter(|(_, hours)| include_zero || hours.abs() > 0.0)
        .map(|(group, hours)| ReportRow {
            start: start.clone(),
            end: end.clone(),
            group: group.clone(),
            duration: *hours,
        })
        .collect()
}
