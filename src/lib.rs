//! Picks one item a day from a set of syndication feeds.
//!
//! A run fetches every configured feed ([`feed`]), scores each entry by
//! freshness and summary length ([`pick`]), keeps the single best one (or a
//! fixed fallback record), and writes it as `daily.json` ([`publish`]).
//!
//! The scoring and selection core in [`pick`] is pure: it takes the fetched
//! entries and one clock reading, and always returns exactly one record.

pub mod config;
pub mod feed;
pub mod pick;
pub mod publish;
pub mod util;
