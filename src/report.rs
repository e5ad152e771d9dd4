//! Report aggregation
//!
//! A report walks the timesheet in insertion order and attributes to each
//! entry the time elapsed since the previous entry in the window. The log
//! has no start-of-day marker, so the first entry of each calendar day
//! starts a fresh span and gets zero duration: overnight idle time is
//! never charged to a task.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use serde::{Serialize, Serializer};

use crate::codec::{self, ParsedEntry};
use crate::error::{Error, Result};
use crate::store::{LogEntry, Store};

/// FullCalendar class for break entries
pub const BREAK_CLASS: &str = "breakEntry";

/// FullCalendar class for ignored entries
pub const IGNORE_CLASS: &str = "ignoreEntry";

/// The `[from, to)` range a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub from: DateTime<FixedOffset>,
    pub to: DateTime<FixedOffset>,
}

impl ReportWindow {
    /// Parse user-supplied bounds; `to` is advanced by one day so the
    /// whole end date is included
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let from = parse_report_date(from)?;
        let to = parse_report_date(to)? + Duration::days(1);
        Ok(Self { from, to })
    }

    pub fn contains(&self, at: &DateTime<FixedOffset>) -> bool {
        *at >= self.from && *at < self.to
    }
}

/// Parse `YYYY-M-D` (local midnight) or an RFC 3339 timestamp with offset
pub fn parse_report_date(text: &str) -> Result<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Local
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| Error::InvalidDate(text.to_string()));
    }
    DateTime::parse_from_rfc3339(text).map_err(|_| Error::InvalidDate(text.to_string()))
}

/// One entry of a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "break", skip_serializing_if = "is_false")]
    pub is_break: bool,
    #[serde(rename = "classNames", skip_serializing_if = "Vec::is_empty")]
    pub class_names: Vec<String>,
    #[serde(serialize_with = "serialize_seconds", skip_serializing_if = "is_zero")]
    pub duration: Duration,
    #[serde(rename = "ignore", skip_serializing_if = "is_false")]
    pub is_ignored: bool,
    /// Start of the span attributed to this entry
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// When the entry was logged
    pub timestamp: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
}

/// Aggregated hours over a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(rename = "reportFrom")]
    pub from: DateTime<FixedOffset>,
    #[serde(rename = "reportTo")]
    pub to: DateTime<FixedOffset>,
    #[serde(rename = "ignoreTotalHours", serialize_with = "serialize_seconds")]
    pub ignore_hours: Duration,
    #[serde(rename = "breakTotalHours", serialize_with = "serialize_seconds")]
    pub break_hours: Duration,
    #[serde(rename = "taskTotalHours", serialize_with = "serialize_seconds")]
    pub task_hours: Duration,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    fn empty(window: ReportWindow) -> Self {
        Self {
            from: window.from,
            to: window.to,
            ignore_hours: Duration::zero(),
            break_hours: Duration::zero(),
            task_hours: Duration::zero(),
            entries: Vec::new(),
        }
    }

    /// Sum of task, break and ignore hours
    pub fn total(&self) -> Duration {
        self.task_hours + self.break_hours + self.ignore_hours
    }
}

/// Read the timesheet and aggregate it over `[from, to + 1 day)`
pub fn compute_report(store: &Store, from: &str, to: &str) -> Result<Report> {
    let window = ReportWindow::parse(from, to)?;
    let log = store.read_all()?;
    aggregate(&log.entries, window)
}

/// Aggregate a snapshot of the log over a window
pub fn aggregate(entries: &[LogEntry], window: ReportWindow) -> Result<Report> {
    aggregate_with(entries, window, codec::decode)
}

/// Aggregate with a custom task decoder
pub fn aggregate_with<F>(entries: &[LogEntry], window: ReportWindow, decode: F) -> Result<Report>
where
    F: Fn(&str) -> Result<ParsedEntry>,
{
    let mut report = Report::empty(window);
    let mut cursor = Cursor::default();

    for entry in entries {
        if entry.task.is_empty() || !window.contains(&entry.end) {
            continue;
        }
        let parsed = match decode(&entry.task) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(id = %entry.id, error = %err, "skipping undecodable entry");
                continue;
            }
        };
        if parsed.is_break && parsed.is_ignored {
            return Err(Error::Aggregation(entry.id.clone()));
        }

        let (anchor, duration) = cursor.advance(entry.end);
        if parsed.is_ignored {
            report.ignore_hours = report.ignore_hours + duration;
        } else if parsed.is_break {
            report.break_hours = report.break_hours + duration;
        } else {
            report.task_hours = report.task_hours + duration;
        }

        report.entries.push(ReportEntry {
            id: entry.id.clone(),
            is_break: parsed.is_break,
            class_names: class_names(&parsed),
            duration,
            is_ignored: parsed.is_ignored,
            start: anchor,
            end: anchor,
            title: parsed.title,
            timestamp: entry.end,
            url: String::new(),
        });
    }

    Ok(report)
}

/// Time of the last aggregated entry
#[derive(Debug, Default)]
struct Cursor {
    previous: Option<DateTime<FixedOffset>>,
}

impl Cursor {
    /// Returns the span anchor and duration for an entry logged at `at`
    fn advance(&mut self, at: DateTime<FixedOffset>) -> (DateTime<FixedOffset>, Duration) {
        let anchor = match self.previous {
            Some(previous) if previous.date_naive() == at.date_naive() => previous,
            _ => at,
        };
        self.previous = Some(at);
        (anchor, at - anchor)
    }
}

fn class_names(parsed: &ParsedEntry) -> Vec<String> {
    let mut classes = Vec::new();
    if parsed.is_break {
        classes.push(BREAK_CLASS.to_string());
    }
    if parsed.is_ignored {
        classes.push(IGNORE_CLASS.to_string());
    }
    classes
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &Duration) -> bool {
    *value == Duration::zero()
}

fn serialize_seconds<S: Serializer>(
    value: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(value.num_seconds())
}
