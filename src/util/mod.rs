//! Utility functions shared by the feed layer and the selection core.
//!
//! - **Text processing**: whitespace collapsing, length capping, HTML-to-text conversion
//! - **URL validation**: rejecting feed URLs that point at internal hosts
//!
//! # Examples
//!
//! ```
//! use daily_drop::util::{clean_text, html_to_text, validate_feed_url};
//!
//! assert_eq!(clean_text(&html_to_text("<p>Hello\n world</p>"), 180), "Hello world");
//! assert!(validate_feed_url("https://example.com/feed.xml").is_ok());
//! ```

mod text;
mod url_validator;

pub use text::{clean_text, html_to_text};
pub use url_validator::{validate_feed_url, UrlValidationError};
