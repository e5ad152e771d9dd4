//! Report rendering: plain text, JSON, and FullCalendar event feeds.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike};
use serde::Serialize;

use crate::error::Result;
use crate::report::{Report, ReportEntry};

/// Output shape for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human readable listing grouped by day
    #[default]
    Text,
    /// The full report as JSON
    Json,
    /// FullCalendar event feed
    Fc,
}

/// A FullCalendar event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(rename = "classNames", skip_serializing_if = "Vec::is_empty")]
    pub class_names: Vec<String>,
}

impl From<&ReportEntry> for CalendarEvent {
    fn from(entry: &ReportEntry) -> Self {
        Self {
            start: entry.start,
            end: entry.start + entry.duration,
            title: entry.title.clone(),
            url: String::new(),
            class_names: entry.class_names.clone(),
        }
    }
}

/// Render a report in the requested format
pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Fc => {
            let events: Vec<CalendarEvent> = report.entries.iter().map(CalendarEvent::from).collect();
            Ok(serde_json::to_string(&events)?)
        }
        ReportFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Report Start: {}", report.from);
    let _ = writeln!(out, "Report End: {}", report.to);
    let _ = writeln!(out, "Total Task Hours: {}", format_duration(report.task_hours));
    let _ = writeln!(out, "Total Break Hours: {}", format_duration(report.break_hours));
    let _ = writeln!(out, "Total Ignore Hours: {}", format_duration(report.ignore_hours));

    let mut day: Option<NaiveDate> = None;
    for entry in &report.entries {
        let date = entry.end.date_naive();
        if day != Some(date) {
            day = Some(date);
            out.push('\n');
            let _ = writeln!(
                out,
                "----------------------- {}, {}-{}-{} -----------------------",
                entry.end.format("%A"),
                date.year(),
                date.month(),
                date.day()
            );
        }
        let _ = writeln!(
            out,
            "({}) {}-{} -- {}",
            format_duration(entry.duration),
            clock(&entry.start),
            clock(&entry.timestamp),
            entry.title
        );
    }
    out
}

fn clock(at: &DateTime<FixedOffset>) -> String {
    format!("{}:{:02}", at.hour(), at.minute())
}

/// Format a duration as `1h2m3s`, dropping leading zero units
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}
