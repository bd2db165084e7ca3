//! HTTP fetching with politeness throttling and robots.txt gating.
//!
//! The [`Fetcher`] owns one shared `reqwest::Client`, a per-origin robots
//! cache, and the politeness delay. Every failure maps to a typed
//! [`FetchError`]; callers treat all variants as "no content for this URL"
//! and keep going, so a fetch failure never aborts a topic or the run.
//!
//! No retries happen here. Retry policy belongs to the summarizer's
//! rate-limit handling, not to page fetching.

use crate::config::FetchConfig;
use crate::models::SourceDocument;
use crate::robots::RobotsCache;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, instrument};
use url::Url;

/// Errors that can occur while fetching one URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("blocked by robots.txt")]
    Blocked,
    #[error("request timed out")]
    Timeout,
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("no readable text in PDF")]
    UnreadablePdf,
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Request(e)
    }
}

/// Polite HTTP fetcher for article and PDF URLs.
pub struct Fetcher {
    client: reqwest::Client,
    robots: RobotsCache,
    respect_robots: bool,
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            robots: RobotsCache::new(&config.user_agent),
            respect_robots: config.respect_robots,
            delay_min_ms: config.delay_min_ms.min(config.delay_max_ms),
            delay_max_ms: config.delay_max_ms.max(config.delay_min_ms),
        })
    }

    /// Randomized pause before each outbound request. A throttle, not a
    /// retry mechanism.
    async fn polite_delay(&self) {
        let ms = rand::rng().random_range(self.delay_min_ms..=self.delay_max_ms);
        debug!(delay_ms = ms, "Politeness delay");
        sleep(Duration::from_millis(ms)).await;
    }

    async fn gate(&mut self, url: &str) -> Result<Url, FetchError> {
        let parsed =
            Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if self.respect_robots && !self.robots.allowed(&self.client, &parsed).await {
            return Err(FetchError::Blocked);
        }
        self.polite_delay().await;
        Ok(parsed)
    }

    /// Fetch a page body as text.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch_html(&mut self, url: &str) -> Result<String, FetchError> {
        let parsed = self.gate(url).await?;
        let resp = self.client.get(parsed).send().await.map_err(classify)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }
        let body = resp.text().await.map_err(classify)?;
        debug!(bytes = body.len(), "Fetched page body");
        Ok(body)
    }

    /// Fetch a PDF and salvage its printable text.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch_pdf_text(&mut self, url: &str) -> Result<String, FetchError> {
        let parsed = self.gate(url).await?;
        let resp = self.client.get(parsed).send().await.map_err(classify)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }
        let bytes = resp.bytes().await.map_err(classify)?;
        salvage_pdf_text(&bytes).ok_or(FetchError::UnreadablePdf)
    }
}

/// Best-effort text salvage from PDF bytes: keep printable ASCII runs and
/// normalize whitespace. Works for simple text-based PDFs only; anything
/// image-heavy yields too little text and is rejected.
pub fn salvage_pdf_text(bytes: &[u8]) -> Option<String> {
    let printable: String = bytes
        .iter()
        .map(|&b| {
            if (0x20..=0x7e).contains(&b) || b == b'\n' {
                b as char
            } else {
                ' '
            }
        })
        .collect();
    let text = printable.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.len() > 100 { Some(text) } else { None }
}

/// Process-lifetime cache of extracted content, keyed by URL.
///
/// Lets a topic that shares URLs with another (or a `--topic` re-run inside
/// one process) skip the fetch entirely. No eviction; the curated URL lists
/// are small.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: HashMap<String, SourceDocument>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&SourceDocument> {
        self.entries.get(url)
    }

    pub fn insert(&mut self, doc: SourceDocument) {
        self.entries.insert(doc.url.clone(), doc);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
