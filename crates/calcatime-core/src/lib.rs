//! Core logic for calcatime.
//!
//! This crate contains:
//! - Timespan resolution: turning "last week" or "next month" into a date interval
//! - Event grouping: partitioning calendar events by title, category or pattern
//! - Totals: summing event hours per group into report rows

pub mod event;
pub mod grouping;
pub mod report;
pub mod timespan;

pub use event::{CalendarEvent, EventError};
pub use grouping::{
    Attribute, GroupedEvents, GroupingError, GroupingSpec, Totals, UNCATEGORIZED, group,
    group_by_category, group_by_pattern, group_by_title, totals,
};
pub use report::{ReportRow, build_rows};
pub use timespan::{DateInterval, TimespanError, resolve};
