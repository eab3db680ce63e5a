//! Serializes the selected record and writes it to disk.
//!
//! The document shape is fixed:
//!
//! ```json
//! {
//!   "generatedAt": "2026-10-18T06:00:00.000Z",
//!   "source": "arXiv quant-ph",
//!   "title": "…",
//!   "url": "https://…",
//!   "date": "2026-10-17T20:00:00.000Z",
//!   "summary": "…"
//! }
//! ```
//!
//! `title` and `url` are omitted when the item has none; `date` is `null`.

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pick::{format_timestamp, SelectionResult};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to serialize daily record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The persisted form of a [`SelectionResult`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord<'a> {
    pub generated_at: String,
    pub source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    pub date: Option<&'a str>,
    pub summary: &'a str,
}

impl<'a> From<&'a SelectionResult> for DailyRecord<'a> {
    fn from(result: &'a SelectionResult) -> Self {
        Self {
            generated_at: format_timestamp(result.generated_at),
            source: &result.item.source,
            title: result.item.title.as_deref(),
            url: result.item.url.as_deref(),
            date: result.item.date.as_deref(),
            summary: &result.item.summary,
        }
    }
}

/// Renders the record as pretty-printed JSON (two-space indent).
pub fn render(result: &SelectionResult) -> Result<String, PublishError> {
    Ok(serde_json::to_string_pretty(&DailyRecord::from(result))?)
}

/// Writes the record to `path`, replacing any previous file atomically.
pub fn write_record(result: &SelectionResult, path: &Path) -> Result<(), PublishError> {
    let json = render(result)?;
    atomic_write(path, json.as_bytes())?;

    tracing::info!(
        path = %path.display(),
        title = result.item.title.as_deref().unwrap_or(""),
        source = %result.item.source,
        "Wrote daily record"
    );
    Ok(())
}

/// Write-to-temp-then-rename so readers never see a half-written file.
fn atomic_write(dst: &Path, content: &[u8]) -> Result<(), PublishError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| PublishError::Io { path, source }
    };

    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    // Unpredictable temp name; create_new refuses to follow a planted symlink
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let result = (|| {
        let mut temp_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        temp_file.write_all(content)?;
        temp_file.sync_all()?;
        drop(temp_file);

        // Windows rename fails if the destination exists
        #[cfg(windows)]
        if dst.exists() {
            std::fs::remove_file(dst)?;
        }

        std::fs::rename(&temp_path, dst)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result.map_err(io_err(dst))
}
