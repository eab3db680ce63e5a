use chrono::{DateTime, Utc};
use feed_rs::parser;

use crate::util::html_to_text;

/// One entry as it came out of a feed, before any normalization.
///
/// Every field is optional: feeds in the wild omit titles, links, and dates
/// freely, and the selection core has to cope with all of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Structured publish timestamp (`published`, else `updated`).
    pub iso_date: Option<DateTime<Utc>>,
    /// Last-updated timestamp as RFC 2822 text.
    pub pub_date: Option<String>,
    /// Plain-text description: markup removed, entities decoded.
    pub content_snippet: Option<String>,
    /// Full content body, markup intact.
    pub content: Option<String>,
}

/// Parses an RSS 2.0, Atom, or JSON Feed document into raw entries.
///
/// Entry order is preserved. Field mapping:
///
/// - `title` ← entry title text
/// - `link` ← first link's `href`
/// - `iso_date` ← `published` (`pubDate` in RSS), else `updated`
/// - `pub_date` ← `updated`, rendered as RFC 2822 text
/// - `content_snippet` ← `summary`/`description` as plain text, or the
///   content body as plain text when there is no summary
/// - `content` ← `content` body (`content:encoded` in RSS)
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawEntry>, parser::ParseFeedError> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let content = entry.content.and_then(|c| c.body);
            let content_snippet = entry
                .summary
                .map(|s| s.content)
                .filter(|s| !s.is_empty())
                .or_else(|| content.clone())
                .map(|s| html_to_text(&s).into_owned());

            RawEntry {
                title: entry.title.map(|t| t.content),
                link: entry.links.first().map(|l| l.href.clone()),
                iso_date: entry.published.or(entry.updated),
                pub_date: entry.updated.map(|dt| dt.to_rfc2822()),
                content_snippet,
                content,
            }
        })
        .collect();

    Ok(entries)
}
