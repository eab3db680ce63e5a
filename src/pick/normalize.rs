use chrono::{DateTime, SecondsFormat, Utc};
use std::borrow::Cow;

use crate::feed::RawEntry;
use crate::util::{clean_text, html_to_text};

/// Default cap, in characters, for cleaned summaries.
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 180;

/// A feed entry reduced to the uniform shape the scorer and selector work on.
///
/// Built once per raw entry and never mutated. Entries missing a title or a
/// link still become a `NormalizedItem`; the scorer is what marks them
/// unselectable.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedItem {
    /// Label of the feed the entry came from.
    pub source: String,
    pub title: Option<String>,
    pub url: Option<String>,
    /// Publish timestamp as text: RFC 3339 for structured timestamps, the
    /// feed's own text otherwise. See [`NormalizedItem::published_at`].
    pub date: Option<String>,
    /// Whitespace-collapsed, length-capped description. May be empty.
    pub summary: String,
}

impl NormalizedItem {
    /// Parses [`date`](Self::date) into a UTC timestamp.
    ///
    /// Accepts RFC 3339 (Atom, JSON Feed, and our own rendering of structured
    /// timestamps) and RFC 2822 (RSS `pubDate`). Anything else is `None`.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let text = self.date.as_deref()?.trim();
        DateTime::parse_from_rfc3339(text)
            .or_else(|_| DateTime::parse_from_rfc2822(text))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// True when both title and url are present and non-empty.
    pub fn is_selectable(&self) -> bool {
        is_present(self.title.as_deref()) && is_present(self.url.as_deref())
    }
}

fn is_present(field: Option<&str>) -> bool {
    field.is_some_and(|s| !s.is_empty())
}

/// Renders a timestamp the way published documents carry it:
/// RFC 3339, millisecond precision, `Z` suffix.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts one raw entry into a [`NormalizedItem`].
///
/// Title and link are carried over untouched. The date prefers the structured
/// timestamp and falls back to the secondary text field. The summary comes
/// from the content snippet, or the full content body converted to plain text
/// when the snippet is missing or empty, cleaned with [`clean_text`].
///
/// Never fails: missing fields stay missing, a missing summary source yields
/// an empty summary.
pub fn normalize(entry: &RawEntry, source: &str, summary_max_chars: usize) -> NormalizedItem {
    let date = entry
        .iso_date
        .map(format_timestamp)
        .or_else(|| entry.pub_date.clone());

    let summary_source = match entry.content_snippet.as_deref().filter(|s| !s.is_empty()) {
        Some(snippet) => Cow::Borrowed(snippet),
        None => entry.content.as_deref().map(html_to_text).unwrap_or_default(),
    };

    NormalizedItem {
        source: source.to_string(),
        title: entry.title.clone(),
        url: entry.link.clone(),
        date,
        summary: clean_text(&summary_source, summary_max_chars),
    }
}
