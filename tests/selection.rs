//! Property tests for the scoring and selection core.
//!
//! The clock is a fixed value passed into the core, so every property here
//! is reproducible.

use chrono::{DateTime, Duration, TimeZone, Utc};
use daily_drop::feed::{FeedBatch, RawEntry};
use daily_drop::pick::{
    normalize, pick_daily, score, score_batches, select, NormalizedItem, PickOptions,
    SelectPolicy, DEFAULT_FALLBACK_URL, DEFAULT_SUMMARY_MAX_CHARS, UNSELECTABLE,
};
use daily_drop::util::clean_text;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 7, 0, 0).unwrap()
}

fn valid_entry(title: &str, age_hours: i64, snippet: &str) -> RawEntry {
    RawEntry {
        title: Some(title.to_string()),
        link: Some(format!("https://example.com/{title}")),
        iso_date: Some(now() - Duration::hours(age_hours)),
        content_snippet: Some(snippet.to_string()),
        ..RawEntry::default()
    }
}

fn batch(source: &str, entries: Vec<RawEntry>) -> FeedBatch {
    FeedBatch {
        source: source.to_string(),
        entries,
    }
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_text(max: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[a-z \\t\\n]{{0,{max}}}")).unwrap()
}

fn arb_entry() -> impl Strategy<Value = RawEntry> {
    (
        prop::option::of("[A-Za-z ]{0,12}"),
        prop::option::of("https://[a-z]{1,8}\\.com/[a-z]{0,6}"),
        prop::option::of(-48i64..400),
        prop::option::of(arb_text(500)),
        prop::option::of(arb_text(500)),
    )
        .prop_map(|(title, link, age, snippet, content)| RawEntry {
            title,
            link,
            iso_date: age.map(|h| now() - Duration::hours(h)),
            pub_date: None,
            content_snippet: snippet,
            content,
        })
}

fn arb_batches() -> impl Strategy<Value = Vec<FeedBatch>> {
    prop::collection::vec(
        ("[A-Z][a-z]{2,8}", prop::collection::vec(arb_entry(), 0..8))
            .prop_map(|(source, entries)| FeedBatch { source, entries }),
        0..4,
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_selection_is_deterministic(batches in arb_batches()) {
        let opts = PickOptions::default();
        let first = pick_daily(&batches, now(), &opts);
        let second = pick_daily(&batches, now(), &opts);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_always_one_result(batches in arb_batches()) {
        let result = pick_daily(&batches, now(), &PickOptions::default());
        let total: usize = batches.iter().map(|b| b.entries.len()).sum();

        prop_assert_eq!(result.generated_at, now());
        if total == 0 {
            prop_assert!(result.is_fallback());
        } else {
            prop_assert!(batches.iter().any(|b| b.source == result.item.source));
        }
    }

    #[test]
    fn prop_winner_is_first_maximum(batches in arb_batches()) {
        let scored = score_batches(&batches, now(), DEFAULT_SUMMARY_MAX_CHARS);
        prop_assume!(!scored.is_empty());

        let best = scored.iter().map(|s| s.score).fold(f64::NEG_INFINITY, f64::max);
        let expected = scored.iter().find(|s| s.score == best).unwrap().item.clone();

        let result = select(scored, now(), SelectPolicy::KeepBest, DEFAULT_FALLBACK_URL);
        prop_assert_eq!(result.item, expected);
    }

    #[test]
    fn prop_disqualified_scores_below_valid(entry in arb_entry()) {
        let item = normalize(&entry, "Feed", DEFAULT_SUMMARY_MAX_CHARS);
        let s = score(&item, now());
        if item.is_selectable() {
            prop_assert!(s >= 0.0);
            prop_assert!(s <= 7.0);
        } else {
            prop_assert_eq!(s, UNSELECTABLE);
        }
    }

    #[test]
    fn prop_require_selectable_never_emits_unselectable(batches in arb_batches()) {
        let opts = PickOptions {
            policy: SelectPolicy::RequireSelectable,
            ..PickOptions::default()
        };
        let result = pick_daily(&batches, now(), &opts);
        prop_assert!(result.is_fallback() || result.item.is_selectable());
    }

    #[test]
    fn prop_clean_text_shape(text in ".{0,400}", max in 1usize..300) {
        let cleaned = clean_text(&text, max);
        prop_assert!(cleaned.chars().count() <= max);
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        prop_assert!(!cleaned.contains("  "));
        prop_assert!(!cleaned.contains(['\n', '\t', '\r']));
    }
}

// ============================================================================
// Fixed scenarios
// ============================================================================

#[test]
fn test_empty_input_is_exact_fallback() {
    let result = pick_daily(&[], now(), &PickOptions::default());
    assert_eq!(
        result.item,
        NormalizedItem {
            source: "Daily Drop".to_string(),
            title: Some("No fresh item found today — try again later".to_string()),
            url: Some("https://rss.arxiv.org/rss/quant-ph".to_string()),
            date: Some("2026-10-18T07:00:00.000Z".to_string()),
            summary: "Fallback link.".to_string(),
        }
    );
}

#[test]
fn test_tier_gaps() {
    let score_at = |hours| {
        score(
            &normalize(&valid_entry("t", hours, &"a".repeat(100)), "F", 180),
            now(),
        )
    };
    assert_eq!(score_at(10) - score_at(50), 3.0);
    assert_eq!(score_at(50) - score_at(100), 2.0);
}

#[test]
fn test_earlier_feed_wins_tie() {
    let batches = vec![
        batch("First Feed", vec![valid_entry("alpha", 5, "same")]),
        batch("Second Feed", vec![valid_entry("beta", 6, "same")]),
    ];
    let result = pick_daily(&batches, now(), &PickOptions::default());
    assert_eq!(result.item.source, "First Feed");
    assert_eq!(result.item.title.as_deref(), Some("alpha"));
}

#[test]
fn test_substance_breaks_freshness_tie() {
    let batches = vec![batch(
        "Blog",
        vec![
            valid_entry("short", 3, "tiny"),
            valid_entry("long", 20, &"meaningful words ".repeat(20)),
        ],
    )];
    let result = pick_daily(&batches, now(), &PickOptions::default());
    assert_eq!(result.item.title.as_deref(), Some("long"));
}

#[test]
fn test_all_disqualified_returns_first_entry() {
    let mut no_link = valid_entry("no-link", 1, "text");
    no_link.link = None;
    let mut no_title = valid_entry("ignored", 1, "text");
    no_title.title = None;

    let batches = vec![batch("Broken", vec![no_link, no_title])];

    let kept = pick_daily(&batches, now(), &PickOptions::default());
    assert_eq!(kept.item.title.as_deref(), Some("no-link"));
    assert_eq!(kept.item.url, None);

    let strict = PickOptions {
        policy: SelectPolicy::RequireSelectable,
        ..PickOptions::default()
    };
    assert!(pick_daily(&batches, now(), &strict).is_fallback());
}

#[test]
fn test_disqualified_item_loses_to_stale_valid_item() {
    let mut fresh_but_untitled = valid_entry("x", 1, &"x".repeat(400));
    fresh_but_untitled.title = None;
    let stale = valid_entry("stale", 1000, "");

    let batches = vec![batch("Feed", vec![fresh_but_untitled, stale])];
    let result = pick_daily(&batches, now(), &PickOptions::default());
    assert_eq!(result.item.title.as_deref(), Some("stale"));
}
