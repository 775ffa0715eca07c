//! Report command: resolve the timespan, fetch events, group and total them.

use anyhow::{Context, Result};
use calcatime_core::{DateInterval, GroupingSpec, ReportRow, build_rows, group, resolve, totals};
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::provider::EventSource;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Everything the report needs besides the event source.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub timespan: Vec<String>,
    pub grouping: GroupingSpec,
    pub include_zero: bool,
}

/// Computed report: the resolved interval and one row per group.
#[derive(Debug)]
pub struct ReportData {
    pub interval: DateInterval,
    pub rows: Vec<ReportRow>,
}

/// Generates report data for `today`.
pub fn generate_report_data(
    source: &dyn EventSource,
    options: &ReportOptions,
    today: NaiveDate,
) -> Result<ReportData> {
    let interval = resolve(&options.timespan, today).context("failed to resolve timespan")?;
    tracing::debug!(%interval, "resolved report interval");

    let events = source
        .fetch(&interval)
        .context("failed to fetch calendar events")?;
    tracing::debug!(count = events.len(), "fetched events");

    let grouped = group(&events, &options.grouping).context("failed to group events")?;
    let totals = totals(&grouped);
    let rows = build_rows(&interval, &totals, options.include_zero);

    Ok(ReportData { interval, rows })
}

// ========== Output ==========

/// Formats rows as CSV with a header; text fields are quoted.
pub fn format_report_csv(rows: &[ReportRow]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if rows.is_empty() {
        writer.write_record(["start", "end", "group", "duration"])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer.into_inner().context("failed to flush CSV output")?;
    Ok(String::from_utf8(bytes)?)
}

/// Formats rows as a compact JSON array.
pub fn format_report_json(rows: &[ReportRow]) -> Result<String> {
    Ok(serde_json::to_string(rows)?)
}

// ========== Public Interface ==========

/// Runs the report command and returns the rendered output.
pub fn run(
    source: &dyn EventSource,
    options: &ReportOptions,
    format: OutputFormat,
    today: NaiveDate,
) -> Result<String> {
    let data = generate_report_data(source, options, today)?;
    tracing::info!(
        interval = %data.interval,
        groups = data.rows.len(),
        "report generated"
    );

    match format {
        OutputFormat::Csv => format_report_csv(&data.rows),
        OutputFormat::Json => format_report_json(&data.rows),
    }
}
