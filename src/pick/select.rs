use chrono::{DateTime, Utc};

use super::normalize::{format_timestamp, NormalizedItem};
use super::score::UNSELECTABLE;

/// Source label of the fallback record.
pub const FALLBACK_SOURCE: &str = "Daily Drop";
/// Title of the fallback record.
pub const FALLBACK_TITLE: &str = "No fresh item found today — try again later";
/// Summary of the fallback record.
pub const FALLBACK_SUMMARY: &str = "Fallback link.";
/// Link used by the fallback record unless configured otherwise.
pub const DEFAULT_FALLBACK_URL: &str = "https://rss.arxiv.org/rss/quant-ph";

/// A normalized item paired with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub item: NormalizedItem,
    pub score: f64,
}

/// What to do when the best item carries the unselectable score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectPolicy {
    /// Emit the top-sorted item even when it lacks a title or url.
    #[default]
    KeepBest,
    /// Emit the fallback record instead of an unselectable item.
    RequireSelectable,
}

/// The single record published for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    pub item: NormalizedItem,
    /// When the selection was made.
    pub generated_at: DateTime<Utc>,
}

impl SelectionResult {
    /// True when this is the fixed fallback record rather than a feed item.
    pub fn is_fallback(&self) -> bool {
        self.item.source == FALLBACK_SOURCE
            && self.item.title.as_deref() == Some(FALLBACK_TITLE)
            && self.item.summary == FALLBACK_SUMMARY
    }
}

/// Builds the fixed record emitted when there is nothing to pick.
pub fn fallback_item(fallback_url: &str, now: DateTime<Utc>) -> NormalizedItem {
    NormalizedItem {
        source: FALLBACK_SOURCE.to_string(),
        title: Some(FALLBACK_TITLE.to_string()),
        url: Some(fallback_url.to_string()),
        date: Some(format_timestamp(now)),
        summary: FALLBACK_SUMMARY.to_string(),
    }
}

/// Reduces the scored collection to exactly one [`SelectionResult`].
///
/// Items are stably sorted by descending score, so equal scores keep their
/// ingestion order and the earliest one wins. An empty collection yields the
/// fallback record. Under [`SelectPolicy::KeepBest`] the winner is returned
/// even if its score is [`UNSELECTABLE`].
///
/// `now` becomes `generated_at` (and the fallback's date); callers capture it
/// once per run.
pub fn select(
    mut scored: Vec<ScoredItem>,
    now: DateTime<Utc>,
    policy: SelectPolicy,
    fallback_url: &str,
) -> SelectionResult {
    // slice::sort_by is stable; scores are never NaN
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let winner = scored.into_iter().next().filter(|top| {
        policy == SelectPolicy::KeepBest || top.score > UNSELECTABLE
    });

    let item = match winner {
        Some(top) => {
            tracing::debug!(
                source = %top.item.source,
                score = top.score,
                title = top.item.title.as_deref().unwrap_or(""),
                "Selected top item"
            );
            top.item
        }
        None => {
            tracing::info!(%fallback_url, "No usable item, emitting fallback record");
            fallback_item(fallback_url, now)
        }
    };

    SelectionResult {
        item,
        generated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 6, 0, 0).unwrap()
    }

    fn scored(title: &str, score: f64) -> ScoredItem {
        ScoredItem {
            item: NormalizedItem {
                source: "Feed".to_string(),
                title: Some(title.to_string()),
                url: Some(format!("https://example.com/{title}")),
                date: None,
                summary: String::new(),
            },
            score,
        }
    }

    #[test]
    fn test_highest_score_wins() {
        let result = select(
            vec![scored("low", 1.0), scored("high", 6.5), scored("mid", 2.0)],
            now(),
            SelectPolicy::KeepBest,
            DEFAULT_FALLBACK_URL,
        );
        assert_eq!(result.item.title.as_deref(), Some("high"));
        assert_eq!(result.generated_at, now());
        assert!(!result.is_fallback());
    }

    #[test]
    fn test_ties_keep_ingestion_order() {
        let result = select(
            vec![scored("first", 5.0), scored("second", 5.0), scored("third", 5.0)],
            now(),
            SelectPolicy::KeepBest,
            DEFAULT_FALLBACK_URL,
        );
        assert_eq!(result.item.title.as_deref(), Some("first"));

        let result = select(
            vec![scored("low", 1.0), scored("a", 7.0), scored("b", 7.0)],
            now(),
            SelectPolicy::KeepBest,
            DEFAULT_FALLBACK_URL,
        );
        assert_eq!(result.item.title.as_deref(), Some("a"));
    }

    #[test]
    fn test_empty_yields_fallback() {
        let result = select(Vec::new(), now(), SelectPolicy::KeepBest, DEFAULT_FALLBACK_URL);
        assert_eq!(
            result,
            SelectionResult {
                item: NormalizedItem {
                    source: "Daily Drop".to_string(),
                    title: Some("No fresh item found today — try again later".to_string()),
                    url: Some("https://rss.arxiv.org/rss/quant-ph".to_string()),
                    date: Some("2026-10-18T06:00:00.000Z".to_string()),
                    summary: "Fallback link.".to_string(),
                },
                generated_at: now(),
            }
        );
        assert!(result.is_fallback());
    }

    #[test]
    fn test_fallback_url_configurable() {
        let result = select(
            Vec::new(),
            now(),
            SelectPolicy::KeepBest,
            "https://example.org/rss",
        );
        assert_eq!(result.item.url.as_deref(), Some("https://example.org/rss"));
    }

    #[test]
    fn test_all_unselectable_keeps_first() {
        let mut a = scored("a", UNSELECTABLE);
        a.item.url = None;
        let mut b = scored("b", UNSELECTABLE);
        b.item.title = None;

        let result = select(
            vec![a.clone(), b],
            now(),
            SelectPolicy::KeepBest,
            DEFAULT_FALLBACK_URL,
        );
        assert_eq!(result.item, a.item);
        assert!(!result.is_fallback());
    }

    #[test]
    fn test_require_selectable_falls_back() {
        let mut a = scored("a", UNSELECTABLE);
        a.item.url = None;

        let result = select(
            vec![a],
            now(),
            SelectPolicy::RequireSelectable,
            DEFAULT_FALLBACK_URL,
        );
        assert!(result.is_fallback());
    }

    #[test]
    fn test_require_selectable_prefers_valid_item() {
        let mut bad = scored("bad", UNSELECTABLE);
        bad.item.title = None;

        let result = select(
            vec![bad, scored("good", 0.0)],
            now(),
            SelectPolicy::RequireSelectable,
            DEFAULT_FALLBACK_URL,
        );
        assert_eq!(result.item.title.as_deref(), Some("good"));
    }
}
