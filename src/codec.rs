//! Task text decoding
//!
//! A task is stored verbatim as the user typed it. Decoding takes the
//! leftmost run of title characters, and a modifier token directly after
//! it classifies the entry. Anything after that run is ignored, so
//! `fix bug #42` decodes with the title `fix bug`.
//!
//! ```text
//! write report        plain task
//! coffee **           break
//! commute ***         ignored
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Break modifier token
pub const BREAK_MARKER: &str = "**";

/// Ignore modifier token
pub const IGNORE_MARKER: &str = "***";

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<title>[A-Za-z0-9,._+:@%/-]+[A-Za-z0-9,._+:@%/ \t-]*) ?(?P<modifier>\*\*\*?)?",
    )
    .expect("entry grammar is a valid regex")
});

/// Title and classification decoded from a task string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub title: String,
    pub is_break: bool,
    pub is_ignored: bool,
}

impl ParsedEntry {
    /// Neither a break nor ignored
    pub fn is_task(&self) -> bool {
        !self.is_break && !self.is_ignored
    }
}

/// Decode task text into its title and modifier flags
///
/// Fails with `Error::InvalidEncoding` when the text holds no title
/// character at all.
pub fn decode(task: &str) -> Result<ParsedEntry> {
    let caps = ENTRY_RE
        .captures(task.trim())
        .ok_or_else(|| Error::InvalidEncoding(task.to_string()))?;

    let title = caps
        .name("title")
        .map(|m| m.as_str().trim_end())
        .unwrap_or_default();
    let modifier = caps.name("modifier").map(|m| m.as_str());

    Ok(ParsedEntry {
        title: title.to_string(),
        is_break: modifier == Some(BREAK_MARKER),
        is_ignored: modifier == Some(IGNORE_MARKER),
    })
}
