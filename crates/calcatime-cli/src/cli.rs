//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

/// Calculates total time from calendar events, grouped by an event attribute.
///
/// Timespan tokens: today, yesterday, week, month, year, monday|mon ...
/// sunday|sun. Prefix with `last` or `next` (repeatable), e.g. `last last week`.
///
/// Grouping attributes: `category[:<regex>]` or `title[:<regex>]`.
#[derive(Debug, Parser)]
#[command(name = "calcatime", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Calendar provider URI, e.g. `exchange:<server url>` or `file:<path>`.
    #[arg(short = 'c', long = "calendar", value_name = "CALENDAR_URI")]
    pub calendar: Option<String>,

    /// Domain name for the calendar account.
    #[arg(short, long)]
    pub domain: Option<String>,

    /// User name for the calendar account.
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password for the calendar account.
    #[arg(short, long)]
    pub password: Option<String>,

    /// Only include events in the given time span.
    #[arg(required = true, value_name = "TIMESPAN")]
    pub timespan: Vec<String>,

    /// Group total times by the given event attribute.
    #[arg(long = "by", value_name = "EVENT_ATTR")]
    pub by: Option<String>,

    /// Include zero totals in output.
    #[arg(long)]
    pub include_zero: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Output format selection. CSV is used when neither flag is given.
#[derive(Debug, Clone, Copy, Default, Args)]
#[group(multiple = false)]
pub struct OutputArgs {
    /// Output data as JSON.
    #[arg(long)]
    pub json: bool,

    /// Output data as CSV.
    #[arg(long)]
    pub csv: bool,
}
