use crate::config::FeedSource;
use crate::feed::parser::{parse_feed, RawEntry};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::Duration;
use thiserror::Error;

const MAX_RETRIES: u32 = 3;
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_CONCURRENT_FETCHES: usize = 4;

/// Errors that can occur while fetching a single feed.
///
/// These cover the full lifecycle of a fetch: network issues, HTTP errors,
/// oversized or truncated bodies, and parse failures.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Feed could not be parsed as RSS, Atom, or JSON Feed
    #[error("Parse error: {0}")]
    Parse(String),
    /// Server returned 429 Too Many Requests after max retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// A feed failure during ingestion, tagged with the feed that caused it.
///
/// Ingestion is all-or-nothing: the first failing feed aborts the run.
#[derive(Debug, Error)]
#[error("Feed '{name}' ({url}) failed: {source}")]
pub struct IngestError {
    pub name: String,
    pub url: String,
    #[source]
    pub source: FetchError,
}

/// All entries from one feed, labelled with the feed's configured name.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedBatch {
    pub source: String,
    pub entries: Vec<RawEntry>,
}

/// Builds the HTTP client used for feed requests.
///
/// `timeout` bounds every request from connect to the last body byte.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Fetches every configured feed and returns their entries in config order.
///
/// Up to 4 feeds are fetched at once. Results are re-ordered to match
/// `sources` so the selection core sees a stable ingestion order no matter
/// which request finishes first.
///
/// # Errors
///
/// Returns an [`IngestError`] for the first feed that fails. No partial
/// result is returned.
pub async fn fetch_all(
    client: &reqwest::Client,
    sources: &[FeedSource],
    timeout: Duration,
) -> Result<Vec<FeedBatch>, IngestError> {
    stream::iter(sources)
        .map(|source| async move {
            fetch_feed(client, source, timeout)
                .await
                .map_err(|e| IngestError {
                    name: source.name.clone(),
                    url: source.url.clone(),
                    source: e,
                })
        })
        .buffered(MAX_CONCURRENT_FETCHES)
        .try_collect()
        .await
}

/// Fetches and parses a single feed.
///
/// # Behavior
///
/// - Each attempt, headers and body together, is bounded by `timeout`
/// - HTTP 429, 5xx, and truncated bodies are retried with exponential
///   backoff (1s, 2s, 4s), at most 3 retries
/// - Other 4xx responses fail immediately
/// - Bodies over 10MB are rejected
pub async fn fetch_feed(
    client: &reqwest::Client,
    source: &FeedSource,
    timeout: Duration,
) -> Result<FeedBatch, FetchError> {
    let bytes = fetch_bytes(client, &source.url, timeout).await?;

    let entries = parse_feed(&bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

    tracing::debug!(
        feed = %source.name,
        url = %source.url,
        entries = entries.len(),
        bytes = bytes.len(),
        "Fetched feed"
    );

    Ok(FeedBatch {
        source: source.name.clone(),
        entries,
    })
}

async fn fetch_bytes(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    let mut retry_count = 0;

    loop {
        // One deadline per attempt covers both the headers and the body
        let deadline = tokio::time::Instant::now() + timeout;

        let response = tokio::time::timeout_at(deadline, client.get(url).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        let status = response.status();
        let delay_secs = 2u64.pow(retry_count); // 1s, 2s, 4s

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if retry_count >= MAX_RETRIES {
                return Err(FetchError::RateLimited(MAX_RETRIES));
            }
            tracing::warn!(
                feed = %url,
                retry = retry_count,
                delay_secs = delay_secs,
                "Rate limited, backing off"
            );
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            retry_count += 1;
            continue;
        }

        if status.is_server_error() {
            if retry_count >= MAX_RETRIES {
                return Err(FetchError::HttpStatus(status.as_u16()));
            }
            tracing::warn!(
                feed = %url,
                status = %status,
                retry = retry_count,
                delay_secs = delay_secs,
                "Server error, retrying after delay"
            );
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            retry_count += 1;
            continue;
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = tokio::time::timeout_at(deadline, read_limited_bytes(response, MAX_FEED_SIZE))
            .await
            .map_err(|_| FetchError::Timeout)?;

        match body {
            Ok(bytes) => return Ok(bytes),
            Err(FetchError::IncompleteResponse { expected, received })
                if retry_count < MAX_RETRIES =>
            {
                tracing::debug!(
                    feed = %url,
                    expected = expected,
                    received = received,
                    attempt = retry_count + 1,
                    delay_secs = delay_secs,
                    "Retrying incomplete download"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                retry_count += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
