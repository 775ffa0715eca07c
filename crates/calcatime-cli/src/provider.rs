//! Calendar providers and event sources.
//!
//! A calendar is addressed as `<provider>[:<location>]`, e.g.
//! `exchange:https://mail.example.com/EWS/Exchange.asmx` or `file:events.jsonl`.
//! What each provider needs is described by its [`Capabilities`].

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

use calcatime_core::{CalendarEvent, DateInterval};
use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while selecting or reading a calendar provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown calendar provider '{0}'")]
    UnknownProvider(String),

    #[error("calendar provider is required (use -c <calendar_uri>)")]
    MissingCalendar,

    #[error("{0} calendar requires a location, e.g. '{0}:<location>'")]
    MissingLocation(CalendarProvider),

    #[error("{0} calendar access credentials are required (-u and -p)")]
    MissingCredentials(CalendarProvider),

    #[error("{0} calendars are not available in this build")]
    Unavailable(CalendarProvider),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid event on line {line}: {source}")]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Supported calendar providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarProvider {
    Exchange,
    Office365,
    Google,
    /// Local JSON Lines export, mainly for offline use and testing.
    File,
}

/// What a provider needs and what it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub requires_location: bool,
    pub requires_credentials: bool,
    pub supports_categories: bool,
}

impl CalendarProvider {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exchange => "exchange",
            Self::Office365 => "office365",
            Self::Google => "google",
            Self::File => "file",
        }
    }

    pub const fn capabilities(&self) -> Capabilities {
        let (requires_location, requires_credentials, supports_categories) = match self {
            Self::Exchange => (true, true, true),
            Self::Office365 => (false, true, true),
            Self::Google => (false, true, false),
            Self::File => (true, false, true),
        };
        Capabilities {
            requires_location,
            requires_credentials,
            supports_categories,
        }
    }
}

impl fmt::Display for CalendarProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CalendarProvider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exchange" => Ok(Self::Exchange),
            "office365" => Ok(Self::Office365),
            "google" | "gmail" => Ok(Self::Google),
            "file" => Ok(Self::File),
            _ => Err(ProviderError::UnknownProvider(s.to_string())),
        }
    }
}

/// A parsed calendar URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarUri {
    pub provider: CalendarProvider,
    pub location: Option<String>,
}

impl FromStr for CalendarUri {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, location) = match s.split_once(':') {
            Some((name, location)) => (name, Some(location).filter(|l| !l.is_empty())),
            None => (s, None),
        };
        let provider: CalendarProvider = name.parse()?;
        if provider.capabilities().requires_location && location.is_none() {
            return Err(ProviderError::MissingLocation(provider));
        }
        Ok(Self {
            provider,
            location: location.map(String::from),
        })
    }
}

/// Account credentials for providers that need them.
#[derive(Clone, Default)]
pub struct Credentials {
    pub domain: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    const fn is_complete(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

/// Something that can list calendar events for an interval.
pub trait EventSource {
    /// Returns the events overlapping `interval`, ordered by start.
    fn fetch(&self, interval: &DateInterval) -> Result<Vec<CalendarEvent>, ProviderError>;
}

/// Opens the event source for `uri`, checking the provider's requirements.
pub fn open_source(
    uri: &CalendarUri,
    credentials: &Credentials,
) -> Result<Box<dyn EventSource>, ProviderError> {
    let caps = uri.provider.capabilities();
    if caps.requires_credentials && !credentials.is_complete() {
        return Err(ProviderError::MissingCredentials(uri.provider));
    }
    tracing::debug!(provider = %uri.provider, location = ?uri.location, ?credentials, "opening calendar");

    match (uri.provider, uri.location.as_deref()) {
        (CalendarProvider::File, Some(location)) => Ok(Box::new(FileSource::new(location))),
        (CalendarProvider::File, None) => Err(ProviderError::MissingLocation(uri.provider)),
        (provider, _) => Err(ProviderError::Unavailable(provider)),
    }
}

/// Reads events from a JSON Lines file, one event object per line.
///
/// The path `-` reads from stdin.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for FileSource {
    fn fetch(&self, interval: &DateInterval) -> Result<Vec<CalendarEvent>, ProviderError> {
        let label = self.path.display().to_string();
        let events = if self.path.as_os_str() == "-" {
            parse_events(io::stdin().lock(), &label)?
        } else {
            let file = File::open(&self.path).map_err(|source| ProviderError::Io {
                path: label.clone(),
                source,
            })?;
            parse_events(BufReader::new(file), &label)?
        };

        let mut events: Vec<_> = events
            .into_iter()
            .filter(|e| overlaps(e, interval))
            .collect();
        events.sort_by_key(CalendarEvent::local_start);
        tracing::debug!(path = %label, count = events.len(), "loaded events");
        Ok(events)
    }
}

fn parse_events<R: BufRead>(reader: R, path: &str) -> Result<Vec<CalendarEvent>, ProviderError> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ProviderError::Io {
            path: path.to_string(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event = serde_json::from_str(trimmed)
            .map_err(|source| ProviderError::InvalidEvent { line: idx + 1, source })?;
        events.push(event);
    }
    Ok(events)
}

/// Whether the event touches the interval, using its own wall-clock time.
///
/// Zero-length events count when they sit inside the interval.
fn overlaps(event: &CalendarEvent, interval: &DateInterval) -> bool {
    let start = midnight(interval.start());
    let end = midnight(interval.end());
    let (event_start, event_end) = (event.local_start(), event.local_end());
    event_start < end && (event_end > start || event_start >= start)
}

fn midnight(date: chrono::NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}
