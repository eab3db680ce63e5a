use chrono::{DateTime, Utc};

use super::normalize::NormalizedItem;

/// Score given to items lacking a title or url. Lower than anything a
/// selectable item can reach (the minimum there is 0.0).
pub const UNSELECTABLE: f64 = -1.0;

/// Items younger than this many hours get [`FRESH_BONUS`].
const FRESH_HOURS: f64 = 36.0;
/// Items younger than this (but not fresh) get [`RECENT_BONUS`].
const RECENT_HOURS: f64 = 72.0;
const FRESH_BONUS: f64 = 5.0;
const RECENT_BONUS: f64 = 2.0;

/// Summary characters per substance point.
const SUBSTANCE_CHARS_PER_POINT: f64 = 200.0;
const SUBSTANCE_CAP: f64 = 2.0;

const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Computes the desirability score of an item as of `now`.
///
/// Returns [`UNSELECTABLE`] when the title or url is absent or empty.
/// Otherwise the score is `freshness + substance`:
///
/// | age (hours) | freshness |
/// |-------------|-----------|
/// | < 36        | 5         |
/// | 36 – < 72   | 2         |
/// | ≥ 72        | 0         |
///
/// Substance is `summary chars / 200`, capped at 2.0.
///
/// An absent or unparseable date is treated as the Unix epoch, so such items
/// never earn freshness. Dates in the future count as fresh.
pub fn score(item: &NormalizedItem, now: DateTime<Utc>) -> f64 {
    if !item.is_selectable() {
        return UNSELECTABLE;
    }

    freshness(item, now) + substance(item)
}

fn freshness(item: &NormalizedItem, now: DateTime<Utc>) -> f64 {
    let published = item.published_at().unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let age_hours = (now - published).num_milliseconds() as f64 / MILLIS_PER_HOUR;

    if age_hours < FRESH_HOURS {
        FRESH_BONUS
    } else if age_hours < RECENT_HOURS {
        RECENT_BONUS
    } else {
        0.0
    }
}

fn substance(item: &NormalizedItem) -> f64 {
    let chars = item.summary.chars().count() as f64;
    (chars / SUBSTANCE_CHARS_PER_POINT).min(SUBSTANCE_CAP)
}
