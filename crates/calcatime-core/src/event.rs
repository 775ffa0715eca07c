//! Calendar events as delivered by a provider.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

/// Validation errors for calendar events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The event ends before it starts.
    #[error("event '{title}' ends at {end} before it starts at {start}")]
    EndsBeforeStart {
        title: String,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

/// A single (already expanded) calendar event.
///
/// The duration is derived from `start` and `end` and cannot be set on its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct CalendarEvent {
    title: String,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    categories: Vec<String>,
}

impl CalendarEvent {
    /// Creates an event after checking that it does not end before it starts.
    pub fn new(
        title: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        categories: Vec<String>,
    ) -> Result<Self, EventError> {
        let title = title.into();
        if end < start {
            return Err(EventError::EndsBeforeStart { title, start, end });
        }
        Ok(Self {
            title,
            start,
            end,
            categories,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub const fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Category labels, possibly empty.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Start as wall-clock time in the event's own offset.
    pub fn local_start(&self) -> NaiveDateTime {
        self.start.naive_local()
    }

    /// End as wall-clock time in the event's own offset.
    pub fn local_end(&self) -> NaiveDateTime {
        self.end.naive_local()
    }

    /// Length of the event in hours.
    #[expect(
        clippy::cast_precision_loss,
        reason = "millisecond counts stay far below 2^52"
    )]
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 3_600_000.0
    }
}

/// Wire form of an event.
#[derive(Debug, Deserialize)]
struct RawEvent {
    title: String,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    #[serde(default)]
    categories: Vec<String>,
}

impl TryFrom<RawEvent> for CalendarEvent {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Self::new(raw.title, raw.start, raw.end, raw.categories)
    }
}
