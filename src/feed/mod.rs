//! Feed ingestion: HTTP retrieval and RSS/Atom parsing.
//!
//! - [`parser`] - converts feed bytes into [`RawEntry`] values using `feed-rs`
//! - [`fetcher`] - fetches the configured sources with retry, timeout, and
//!   size limits, returning one [`FeedBatch`] per source
//!
//! Any failure here is fatal to the run; the selection core never sees a
//! partial set of feeds.
//!
//! # Example
//!
//! ```ignore
//! use daily_drop::feed::{build_client, fetch_all};
//!
//! let client = build_client(config.fetch_timeout())?;
//! let batches = fetch_all(&client, &config.feeds, config.fetch_timeout()).await?;
//! ```

mod fetcher;
mod parser;

pub use fetcher::{build_client, fetch_all, fetch_feed, FeedBatch, FetchError, IngestError};
pub use parser::{parse_feed, RawEntry};
