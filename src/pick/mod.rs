//! Scoring and selection of the daily item.
//!
//! This is the pure core of the crate. It takes the fully ingested feed
//! batches plus a single clock reading and produces exactly one
//! [`SelectionResult`]:
//!
//! - [`normalize`] turns each raw entry into a [`NormalizedItem`]
//! - [`score`] ranks an item by freshness and summary length
//! - [`select`] stably sorts by score and takes the top item, or the fixed
//!   fallback record when there is nothing to choose from
//!
//! Nothing here performs I/O or reads the system clock.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use daily_drop::pick::{pick_daily, PickOptions};
//!
//! let result = pick_daily(&[], Utc::now(), &PickOptions::default());
//! assert!(result.is_fallback());
//! ```

mod normalize;
mod score;
mod select;

use chrono::{DateTime, Utc};

use crate::feed::FeedBatch;

pub use normalize::{format_timestamp, normalize, NormalizedItem, DEFAULT_SUMMARY_MAX_CHARS};
pub use score::{score, UNSELECTABLE};
pub use select::{
    fallback_item, select, ScoredItem, SelectPolicy, SelectionResult, DEFAULT_FALLBACK_URL,
    FALLBACK_SOURCE, FALLBACK_SUMMARY, FALLBACK_TITLE,
};

/// Knobs for a selection run. Defaults match an unconfigured install.
#[derive(Debug, Clone)]
pub struct PickOptions {
    pub summary_max_chars: usize,
    pub policy: SelectPolicy,
    pub fallback_url: String,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
            policy: SelectPolicy::default(),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
        }
    }
}

/// Normalizes and scores every entry of every batch, in ingestion order.
///
/// No entry is dropped: the output has one [`ScoredItem`] per raw entry.
pub fn score_batches(
    batches: &[FeedBatch],
    now: DateTime<Utc>,
    summary_max_chars: usize,
) -> Vec<ScoredItem> {
    batches
        .iter()
        .flat_map(|batch| {
            batch.entries.iter().map(move |entry| {
                let item = normalize(entry, &batch.source, summary_max_chars);
                let score = score(&item, now);
                ScoredItem { item, score }
            })
        })
        .collect()
}

/// Runs the whole core: normalize, score, select.
///
/// `now` is used both for freshness and as the result's `generated_at`.
pub fn pick_daily(
    batches: &[FeedBatch],
    now: DateTime<Utc>,
    opts: &PickOptions,
) -> SelectionResult {
    let scored = score_batches(batches, now, opts.summary_max_chars);

    tracing::debug!(
        items = scored.len(),
        selectable = scored.iter().filter(|s| s.score > UNSELECTABLE).count(),
        "Scored feed items"
    );

    select(scored, now, opts.policy, &opts.fallback_url)
}
