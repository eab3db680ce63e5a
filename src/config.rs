//! Configuration file parser for ~/.config/daily-drop/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`,
//! which carries the built-in feed list. Unknown keys are accepted by serde
//! but logged as warnings since they are usually typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::pick::{PickOptions, SelectPolicy, DEFAULT_FALLBACK_URL, DEFAULT_SUMMARY_MAX_CHARS};
use crate::util::{validate_feed_url, UrlValidationError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A feed or fallback URL failed validation.
    #[error("Invalid URL for {field}: {source}")]
    InvalidUrl {
        field: String,
        #[source]
        source: UrlValidationError,
    },

    /// A value parsed but is out of range.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// A named feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedSource {
    /// Label copied into every item from this feed (and into the output).
    pub name: String,
    /// RSS/Atom/JSON Feed URL.
    pub url: String,
}

impl FeedSource {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// The feeds used when no config file lists any.
pub fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new("arXiv quant-ph", "https://rss.arxiv.org/rss/quant-ph"),
        FeedSource::new("NVIDIA Dev Blog", "https://developer.nvidia.com/blog/feed"),
    ]
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the selected record is written.
    pub output_path: PathBuf,

    /// Maximum summary length in characters (ellipsis included).
    pub summary_max_chars: usize,

    /// Per-request timeout for feed fetches, in seconds.
    pub fetch_timeout_secs: u64,

    /// Link carried by the fallback record.
    pub fallback_url: String,

    /// Emit the fallback record instead of an item lacking a title or link.
    pub require_selectable: bool,

    /// Feed sources, fetched and scored in this order.
    pub feeds: Vec<FeedSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("daily.json"),
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
            fetch_timeout_secs: 15,
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            require_selectable: false,
            feeds: default_feeds(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "output_path",
        "summary_max_chars",
        "fetch_timeout_secs",
        "fallback_url",
        "require_selectable",
        "feeds",
    ];

    /// Default location: `$HOME/.config/daily-drop/config.toml`.
    ///
    /// Returns `None` when `HOME` is unset.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("daily-drop")
                .join("config.toml"),
        )
    }

    /// Load and validate configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Bad URLs or out-of-range values → `Err`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            feeds = config.feeds.len(),
            output = %config.output_path.display(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot express: URL safety, non-empty names, ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.summary_max_chars == 0 {
            return Err(ConfigError::Invalid(
                "summary_max_chars must be at least 1".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_secs must be at least 1".to_string(),
            ));
        }

        validate_feed_url(&self.fallback_url).map_err(|source| ConfigError::InvalidUrl {
            field: "fallback_url".to_string(),
            source,
        })?;

        for (i, feed) in self.feeds.iter().enumerate() {
            if feed.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("feeds[{i}] has an empty name")));
            }
            validate_feed_url(&feed.url).map_err(|source| ConfigError::InvalidUrl {
                field: format!("feed '{}'", feed.name),
                source,
            })?;
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Selection settings derived from this config.
    pub fn pick_options(&self) -> PickOptions {
        PickOptions {
            summary_max_chars: self.summary_max_chars,
            policy: if self.require_selectable {
                SelectPolicy::RequireSelectable
            } else {
                SelectPolicy::KeepBest
            },
            fallback_url: self.fallback_url.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
