//! Format - Presentation Formatting Utilities
//!
//! Every function here is total: invalid input maps to a sentinel string.

use chrono::{DateTime, Local, TimeZone};

/// Shown when a size cannot be interpreted
pub const UNKNOWN_SIZE: &str = "???";

/// Shown when a date cannot be interpreted
pub const UNKNOWN_DATE: &str = "-";

const SIZE_UNITS: [char; 8] = ['K', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];

/// Format a byte count with binary units (KiB ... YiB)
///
/// Directories render as an empty string.
pub fn format_size(is_directory: bool, size: Option<f64>) -> String {
    if is_directory {
        return String::new();
    }
    let Some(mut number) = size.filter(|n| n.is_finite() && *n >= 0.0) else {
        return UNKNOWN_SIZE.to_string();
    };

    let mut unit = None;
    while number >= 1024.0 && unit.map_or(true, |u| u + 1 < SIZE_UNITS.len()) {
        number /= 1024.0;
        unit = Some(unit.map_or(0, |u| u + 1));
    }

    match unit {
        Some(u) => format!("{:.2} {}iB", number, SIZE_UNITS[u]),
        None => format!("{} B", number),
    }
}

/// Format a millisecond timestamp in local time
pub fn format_date(millis: Option<f64>) -> String {
    format_date_in(millis, &Local)
}

/// Format a millisecond timestamp as `YYYY-MM-DD HH:MM` in `tz`
pub fn format_date_in<Tz: TimeZone>(millis: Option<f64>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(millis) = millis.filter(|m| m.is_finite()) else {
        return UNKNOWN_DATE.to_string();
    };
    match DateTime::from_timestamp_millis(millis.trunc() as i64) {
        Some(dt) => dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// A run of text, optionally emphasized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub text: String,
    pub bold: bool,
}

impl HighlightSpan {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Emphasize the matched prefix of every word of `text`
///
/// `matched[i]` is the prefix matched in the i-th whitespace-separated word;
/// an empty entry leaves that word plain. Words are re-joined with one space.
pub fn highlight_words(text: &str, matched: &[String]) -> Vec<HighlightSpan> {
    if matched.is_empty() {
        return vec![HighlightSpan::plain(text)];
    }

    let mut spans = Vec::new();
    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            spans.push(HighlightSpan::plain(" "));
        }
        let prefix_chars = matched.get(i).map_or(0, |m| m.chars().count());
        if prefix_chars == 0 {
            spans.push(HighlightSpan::plain(word));
            continue;
        }
        let split = word
            .char_indices()
            .nth(prefix_chars)
            .map_or(word.len(), |(at, _)| at);
        spans.push(HighlightSpan::bold(&word[..split]));
        if split < word.len() {
            spans.push(HighlightSpan::plain(&word[split..]));
        }
    }
    spans
}

/// Truncate a string to max characters with ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{head}...")
    }
}
