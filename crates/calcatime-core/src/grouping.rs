//! Event grouping and duration totals.
//!
//! Three grouping strategies are supported:
//! - by title: every event lands in exactly one group named after its title
//! - by category: every event lands in *each* of its categories (fan-out),
//!   uncategorized events land in [`UNCATEGORIZED`]
//! - by pattern: the first title/category matching a regex decides a single
//!   group named after the matched text; non-matching events are dropped
//!
//! Group keys keep the order in which they were first seen.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::event::CalendarEvent;

/// Group name for events without categories.
pub const UNCATEGORIZED: &str = "---";

/// Events per group, keyed by group name in first-seen order.
pub type GroupedEvents<'a> = IndexMap<String, Vec<&'a CalendarEvent>>;

/// Total hours per group, in the same order as the grouping.
pub type Totals = IndexMap<String, f64>;

/// Errors produced while parsing a grouping string or grouping events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GroupingError {
    /// The pattern is not a valid regular expression.
    #[error("invalid grouping pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The attribute before the colon is not `title` or `category`.
    #[error("unknown event attribute '{value}' (expected 'title' or 'category')")]
    UnknownAttribute { value: String },
}

/// Event attribute used as the grouping source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Title,
    Category,
}

impl Attribute {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = GroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "category" => Ok(Self::Category),
            _ => Err(GroupingError::UnknownAttribute {
                value: s.to_string(),
            }),
        }
    }
}

/// How events are grouped for one run.
///
/// Parsed from `title`, `category`, `title:<regex>` or `category:<regex>`.
/// Everything after the first colon is the pattern, colons included. An empty
/// pattern (`title:`) is accepted and groups nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingSpec {
    ByTitle,
    ByCategory,
    ByTitlePattern(String),
    ByCategoryPattern(String),
}

impl GroupingSpec {
    /// Default grouping for a provider, based on whether it reports categories.
    pub const fn default_for(supports_categories: bool) -> Self {
        if supports_categories {
            Self::ByCategory
        } else {
            Self::ByTitle
        }
    }
}

impl FromStr for GroupingSpec {
    type Err = GroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((attr, pattern)) = s.split_once(':') else {
            return Ok(match s.parse::<Attribute>()? {
                Attribute::Title => Self::ByTitle,
                Attribute::Category => Self::ByCategory,
            });
        };

        Ok(match attr.parse::<Attribute>()? {
            Attribute::Title => Self::ByTitlePattern(pattern.to_string()),
            Attribute::Category => Self::ByCategoryPattern(pattern.to_string()),
        })
    }
}

impl fmt::Display for GroupingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByTitle => write!(f, "title"),
            Self::ByCategory => write!(f, "category"),
            Self::ByTitlePattern(p) => write!(f, "title:{p}"),
            Self::ByCategoryPattern(p) => write!(f, "category:{p}"),
        }
    }
}

/// Groups events according to `spec`.
pub fn group<'a>(
    events: &'a [CalendarEvent],
    spec: &GroupingSpec,
) -> Result<GroupedEvents<'a>, GroupingError> {
    let grouped = match spec {
        GroupingSpec::ByTitle => group_by_title(events),
        GroupingSpec::ByCategory => group_by_category(events),
        GroupingSpec::ByTitlePattern(p) | GroupingSpec::ByCategoryPattern(p) if p.is_empty() => {
            GroupedEvents::new()
        }
        GroupingSpec::ByTitlePattern(p) => group_by_pattern(events, p, Attribute::Title)?,
        GroupingSpec::ByCategoryPattern(p) => group_by_pattern(events, p, Attribute::Category)?,
    };
    tracing::debug!(%spec, events = events.len(), groups = grouped.len(), "grouped events");
    Ok(grouped)
}

/// One group per distinct title.
pub fn group_by_title(events: &[CalendarEvent]) -> GroupedEvents<'_> {
    let mut grouped = GroupedEvents::new();
    for event in events {
        grouped.entry(event.title().to_string()).or_default().push(event);
    }
    grouped
}

/// One group per category; an event with N categories is counted in N groups.
pub fn group_by_category(events: &[CalendarEvent]) -> GroupedEvents<'_> {
    let mut grouped = GroupedEvents::new();
    for event in events {
        if event.categories().is_empty() {
            grouped.entry(UNCATEGORIZED.to_string()).or_default().push(event);
            continue;
        }
        for category in event.categories() {
            grouped.entry(category.clone()).or_default().push(event);
        }
    }
    grouped
}

/// Groups each event under the text matched by `pattern` (case-insensitive).
///
/// Candidates are the title, or the categories in order; the first candidate
/// with a match decides the group. Events with no match are left out.
pub fn group_by_pattern<'a>(
    events: &'a [CalendarEvent],
    pattern: &str,
    attr: Attribute,
) -> Result<GroupedEvents<'a>, GroupingError> {
    let re = compile(pattern)?;
    let mut grouped = GroupedEvents::new();

    for event in events {
        let matched = match attr {
            Attribute::Title => re.find(event.title()),
            Attribute::Category => event.categories().iter().find_map(|c| re.find(c)),
        };
        match matched {
            Some(m) => grouped.entry(m.as_str().to_string()).or_default().push(event),
            None => tracing::trace!(title = event.title(), "event matched no group"),
        }
    }
    Ok(grouped)
}

fn compile(pattern: &str) -> Result<Regex, GroupingError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| GroupingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Sums event durations per group.
pub fn totals(grouped: &GroupedEvents<'_>) -> Totals {
    grouped
        .iter()
        .map(|(name, events)| {
            let hours: f64 = events.iter().map(|e| e.duration_hours()).sum();
            (name.clone(), hours)
        })
        .collect()
}
