//! Relative timespan resolution.
//!
//! Turns a list of natural-language tokens ("last week", "next month",
//! "mon") into a half-open `[start, end)` interval of local calendar days.
//!
//! # Resolution Rules
//!
//! 1. Every `last` shifts the result one unit back, every `next` one unit
//!    forward. For day and week tokens the unit is 7 days; for `month` and
//!    `year` it is a whole calendar month/year.
//! 2. The first matching token in the order `today`, `yesterday`, `week`,
//!    `month`, `year`, reserved spans, weekday names decides the span.
//! 3. Weeks start on Monday.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

/// Errors produced while resolving timespan tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimespanError {
    /// No token in the list names a span.
    #[error("could not determine a timespan from: {tokens:?}")]
    Unresolved { tokens: Vec<String> },

    /// The token is part of the vocabulary but has no resolution rule.
    #[error("timespan '{token}' is not implemented")]
    NotImplemented { token: String },

    /// Applying the offsets left the supported calendar range.
    #[error("timespan is outside the supported date range")]
    OutOfRange,

    /// Interval bounds were given in the wrong order.
    #[error("interval start {start} is after end {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// A half-open interval of local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateInterval {
    /// Creates an interval, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TimespanError> {
        if start > end {
            return Err(TimespanError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day in the interval.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day after the interval.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Whether `date` falls inside `[start, end)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Weekday names and abbreviations, indexed from Monday.
const WEEKDAYS: [(&str, &str); 7] = [
    ("monday", "mon"),
    ("tuesday", "tue"),
    ("wednesday", "wed"),
    ("thursday", "thu"),
    ("friday", "fri"),
    ("saturday", "sat"),
    ("sunday", "sun"),
];

/// Span tokens that are reserved but have no resolution rule.
const RESERVED: [&str; 3] = ["decade", "century", "millennium"];

/// Resolves timespan tokens relative to `today`.
///
/// Tokens are compared case-insensitively. Unknown tokens are ignored.
pub fn resolve<S: AsRef<str>>(
    tokens: &[S],
    today: NaiveDate,
) -> Result<DateInterval, TimespanError> {
    let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_lowercase()).collect();
    let has = |name: &str| tokens.iter().any(|t| t == name);

    let last_count = count(&tokens, "last");
    let next_count = count(&tokens, "next");
    let shift = next_count - last_count;
    let offset_days = shift.checked_mul(7).ok_or(TimespanError::OutOfRange)?;

    let days_since_monday = i64::from(today.weekday().num_days_from_monday());
    let week_start = add_days(today, -days_since_monday)?;

    let interval = if has("today") {
        days_from(today, offset_days, 1)?
    } else if has("yesterday") {
        days_from(today, offset_days - 1, 1)?
    } else if has("week") {
        days_from(week_start, offset_days, 7)?
    } else if has("month") {
        month_span(today, shift)?
    } else if has("year") {
        year_span(today, shift)?
    } else if let Some(token) = RESERVED.iter().find(|r| has(**r)) {
        return Err(TimespanError::NotImplemented {
            token: (*token).to_string(),
        });
    } else if let Some(idx) = weekday_index(&tokens) {
        days_from(week_start, offset_days + idx, 1)?
    } else {
        return Err(TimespanError::Unresolved { tokens });
    };

    tracing::debug!(%interval, last_count, next_count, "resolved timespan");
    Ok(interval)
}

#[expect(
    clippy::cast_possible_wrap,
    reason = "token lists are command-line sized"
)]
fn count(tokens: &[String], name: &str) -> i64 {
    tokens.iter().filter(|t| *t == name).count() as i64
}

fn weekday_index(tokens: &[String]) -> Option<i64> {
    WEEKDAYS
        .iter()
        .position(|(full, abbr)| tokens.iter().any(|t| t == full || t == abbr))
        .and_then(|idx| i64::try_from(idx).ok())
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, TimespanError> {
    let delta = Duration::try_days(days).ok_or(TimespanError::OutOfRange)?;
    date.checked_add_signed(delta).ok_or(TimespanError::OutOfRange)
}

/// `len` days starting `offset` days after `anchor`.
fn days_from(anchor: NaiveDate, offset: i64, len: i64) -> Result<DateInterval, TimespanError> {
    let start = add_days(anchor, offset)?;
    let end = add_days(start, len)?;
    DateInterval::new(start, end)
}

/// Calendar month `shift` months away from the month of `today`.
///
/// Wraps across a year boundary at most once: any month before January lands
/// in December of the previous year, any month after December in January of
/// the next.
fn month_span(today: NaiveDate, shift: i64) -> Result<DateInterval, TimespanError> {
    let month = i64::from(today.month()).saturating_add(shift);
    let (year, month) = if month < 1 {
        (today.year() - 1, 12)
    } else if month > 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), month)
    };
    let month = u32::try_from(month).map_err(|_| TimespanError::OutOfRange)?;

    let start = first_of_month(year, month)?;
    let end = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    DateInterval::new(start, end)
}

fn year_span(today: NaiveDate, shift: i64) -> Result<DateInterval, TimespanError> {
    let year = i64::from(today.year())
        .checked_add(shift)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or(TimespanError::OutOfRange)?;
    let next_year = year.checked_add(1).ok_or(TimespanError::OutOfRange)?;
    DateInterval::new(first_of_month(year, 1)?, first_of_month(next_year, 1)?)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, TimespanError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(TimespanError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Jan 29, 2025 is a Wednesday
    fn anchor() -> NaiveDate {
        date(2025, 1, 29)
    }

    fn span(tokens: &[&str], today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let interval = resolve(tokens, today).unwrap();
        (interval.start(), interval.end())
    }

    // ========== Single Token Tests ==========

    #[test]
    fn test_today() {
        assert_eq!(span(&["today"], anchor()), (date(2025, 1, 29), date(2025, 1, 30)));
    }

    #[test]
    fn test_yesterday() {
        assert_eq!(span(&["yesterday"], anchor()), (date(2025, 1, 28), date(2025, 1, 29)));
    }

    #[test]
    fn test_week_starts_on_monday() {
        assert_eq!(span(&["week"], anchor()), (date(2025, 1, 27), date(2025, 2, 3)));
    }

    #[test]
    fn test_week_on_sunday_belongs_to_preceding_monday() {
        // Feb 2, 2025 is a Sunday
        assert_eq!(span(&["week"], date(2025, 2, 2)), (date(2025, 1, 27), date(2025, 2, 3)));
    }

    #[test]
    fn test_week_on_monday() {
        assert_eq!(span(&["week"], date(2025, 1, 27)), (date(2025, 1, 27), date(2025, 2, 3)));
    }

    #[test]
    fn test_month() {
        assert_eq!(span(&["month"], anchor()), (date(2025, 1, 1), date(2025, 2, 1)));
    }

    #[test]
    fn test_year() {
        assert_eq!(span(&["year"], anchor()), (date(2025, 1, 1), date(2026, 1, 1)));
    }

    #[test]
    fn test_wednesday_is_two_days_after_week_start() {
        // Anchor on a Friday so the weekday is not today
        let friday = date(2025, 1, 31);
        let week = resolve(&["week"], friday).unwrap();
        let wed = resolve(&["wednesday"], friday).unwrap();
        assert_eq!((wed.start() - week.start()).num_days(), 2);
        assert_eq!(wed.days(), 1);
    }

    #[test]
    fn test_weekday_abbreviations_match_full_names() {
        for (full, abbr) in WEEKDAYS {
            assert_eq!(
                resolve(&[full], anchor()).unwrap(),
                resolve(&[abbr], anchor()).unwrap(),
                "{full} and {abbr} should resolve identically"
            );
        }
    }

    #[test]
    fn test_sunday_is_last_day_of_week() {
        assert_eq!(span(&["sun"], anchor()), (date(2025, 2, 2), date(2025, 2, 3)));
    }

    #[test]
    fn test_span_lengths_without_modifiers() {
        let anchors = [
            date(2024, 2, 29),
            date(2025, 1, 1),
            date(2025, 6, 15),
            date(2025, 12, 31),
        ];
        for today in anchors {
            assert_eq!(resolve(&["today"], today).unwrap().days(), 1);
            assert_eq!(resolve(&["yesterday"], today).unwrap().days(), 1);
            assert_eq!(resolve(&["week"], today).unwrap().days(), 7);
            let month = resolve(&["month"], today).unwrap().days();
            assert!((28..=31).contains(&month), "month length {month} for {today}");
            let year = resolve(&["year"], today).unwrap().days();
            assert!((365..=366).contains(&year), "year length {year} for {today}");
        }
    }

    // ========== Modifier Tests ==========

    #[test]
    fn test_last_last_week_shifts_back_fourteen_days() {
        let week = resolve(&["week"], anchor()).unwrap();
        let shifted = resolve(&["last", "last", "week"], anchor()).unwrap();
        assert_eq!((week.start() - shifted.start()).num_days(), 14);
        assert_eq!((week.end() - shifted.end()).num_days(), 14);
    }

    #[test]
    fn test_next_week_shifts_forward_seven_days() {
        let week = resolve(&["week"], anchor()).unwrap();
        let shifted = resolve(&["next", "week"], anchor()).unwrap();
        assert_eq!((shifted.start() - week.start()).num_days(), 7);
    }

    #[test]
    fn test_last_and_next_cancel() {
        assert_eq!(
            resolve(&["last", "next", "week"], anchor()).unwrap(),
            resolve(&["week"], anchor()).unwrap()
        );
    }

    #[test]
    fn test_last_today_is_a_week_ago() {
        assert_eq!(span(&["last", "today"], anchor()), (date(2025, 1, 22), date(2025, 1, 23)));
    }

    #[test]
    fn test_last_yesterday() {
        assert_eq!(span(&["yesterday", "last"], anchor()), (date(2025, 1, 21), date(2025, 1, 22)));
    }

    #[test]
    fn test_last_monday() {
        assert_eq!(span(&["last", "mon"], anchor()), (date(2025, 1, 20), date(2025, 1, 21)));
    }

    #[test]
    fn test_last_month_in_january_wraps_to_previous_december() {
        assert_eq!(span(&["last", "month"], anchor()), (date(2024, 12, 1), date(2025, 1, 1)));
    }

    #[test]
    fn test_month_wrap_happens_only_once() {
        // Three months back from January still lands on the previous December
        assert_eq!(
            span(&["last", "last", "last", "month"], anchor()),
            (date(2024, 12, 1), date(2025, 1, 1))
        );
    }

    #[test]
    fn test_next_month_in_december_wraps_to_january() {
        assert_eq!(
            span(&["next", "month"], date(2025, 12, 10)),
            (date(2026, 1, 1), date(2026, 2, 1))
        );
    }

    #[test]
    fn test_two_months_back_is_whole_months_not_days() {
        assert_eq!(
            span(&["last", "last", "month"], date(2025, 3, 31)),
            (date(2025, 1, 1), date(2025, 2, 1))
        );
    }

    #[test]
    fn test_month_sequence_is_disjoint_and_chronological() {
        let today = date(2025, 6, 15);
        let last = resolve(&["last", "month"], today).unwrap();
        let this = resolve(&["month"], today).unwrap();
        let next = resolve(&["next", "month"], today).unwrap();

        assert_eq!(last.end(), this.start());
        assert_eq!(this.end(), next.start());
        for interval in [last, this, next] {
            assert_eq!(interval.start().day(), 1);
            assert_eq!(interval.end().day(), 1);
        }
    }

    #[test]
    fn test_last_last_year() {
        assert_eq!(
            span(&["last", "last", "year"], anchor()),
            (date(2023, 1, 1), date(2024, 1, 1))
        );
    }

    #[test]
    fn test_next_year() {
        assert_eq!(span(&["next", "year"], anchor()), (date(2026, 1, 1), date(2027, 1, 1)));
    }

    // ========== Precedence Tests ==========

    #[test]
    fn test_week_outranks_weekday() {
        assert_eq!(
            resolve(&["last", "week", "friday"], anchor()).unwrap(),
            resolve(&["last", "week"], anchor()).unwrap()
        );
    }

    #[test]
    fn test_today_outranks_everything() {
        assert_eq!(span(&["month", "today", "week"], anchor()), (date(2025, 1, 29), date(2025, 1, 30)));
    }

    #[test]
    fn test_first_weekday_in_calendar_order_wins() {
        assert_eq!(
            resolve(&["fri", "tue"], anchor()).unwrap(),
            resolve(&["tue"], anchor()).unwrap()
        );
    }

    #[test]
    fn test_tokens_are_case_insensitive() {
        assert_eq!(
            resolve(&["LAST", "Week"], anchor()).unwrap(),
            resolve(&["last", "week"], anchor()).unwrap()
        );
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        assert_eq!(
            resolve(&["the", "week", "please"], anchor()).unwrap(),
            resolve(&["week"], anchor()).unwrap()
        );
    }

    // ========== Error Tests ==========

    #[test]
    fn test_empty_tokens_are_unresolved() {
        let tokens: [&str; 0] = [];
        assert!(matches!(
            resolve(&tokens, anchor()),
            Err(TimespanError::Unresolved { .. })
        ));
    }

    #[test]
    fn test_last_alone_is_unresolved() {
        assert!(matches!(
            resolve(&["last"], anchor()),
            Err(TimespanError::Unresolved { .. })
        ));
    }

    #[test]
    fn test_reserved_spans_are_not_implemented() {
        for token in ["decade", "century", "millennium"] {
            let err = resolve(&["last", token], anchor()).unwrap_err();
            assert_eq!(
                err,
                TimespanError::NotImplemented {
                    token: token.to_string()
                }
            );
        }
    }

    #[test]
    fn test_error_message_lists_tokens() {
        let err = resolve(&["fortnight"], anchor()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not determine a timespan from: [\"fortnight\"]"
        );
    }

    // ========== DateInterval Tests ==========

    #[test]
    fn test_interval_rejects_inverted_bounds() {
        assert!(DateInterval::new(date(2025, 2, 1), date(2025, 1, 1)).is_err());
    }

    #[test]
    fn test_interval_is_half_open() {
        let interval = DateInterval::new(date(2025, 1, 1), date(2025, 1, 2)).unwrap();
        assert!(interval.contains(date(2025, 1, 1)));
        assert!(!interval.contains(date(2025, 1, 2)));
    }

    #[test]
    fn test_interval_display() {
        let interval = resolve(&["today"], anchor()).unwrap();
        assert_eq!(interval.to_string(), "[2025-01-29, 2025-01-30)");
    }
}
