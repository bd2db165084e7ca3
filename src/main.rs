//! # Parent Care Cards
//!
//! A content pipeline that turns curated parenting articles into short
//! "advice cards" for a parenting app: fetch each topic's URLs, extract
//! readable text, summarize it into 3-5 tips per card via an
//! OpenAI-compatible LLM (or a guaranteed fallback), and write JSON files
//! per topic.
//!
//! ## Usage
//!
//! ```sh
//! parent_care_cards -t topics.json -o ./cards
//! ```
//!
//! ## Architecture
//!
//! The pipeline runs serially, one topic at a time:
//! 1. **Fetch**: download each curated URL with a politeness delay and an
//!    optional robots.txt check
//! 2. **Extract**: run the strategy chain (article markup → readability →
//!    selector chain) and keep documents above the length threshold
//! 3. **Summarize**: AI variant when configured, degrading to sentence
//!    extraction and finally to hand-authored templates
//! 4. **Assemble & write**: merge topic metadata, enforce the tip
//!    invariant, overwrite the topic's JSON file
//!
//! Per-URL failures are logged and skipped; a topic with zero extracted
//! documents still produces template cards. The only run-aborting error is
//! an unknown topic id passed via `--topic`.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod assemble;
mod clean;
mod cli;
mod config;
mod extract;
mod fetch;
mod models;
mod outputs;
mod robots;
mod summarize;
mod utils;

use cli::Cli;
use config::{ConfigError, PipelineConfig, TopicSet};
use fetch::{ContentCache, Fetcher};
use models::{Card, RunSummary, SourceDocument, Topic, TopicRunStats};
use summarize::Summarizer;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("care card pipeline starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.topics_file, ?args.topic, args.no_ai, "Parsed CLI arguments");

    let config = PipelineConfig::load(args.config.as_deref())?;
    let topics = TopicSet::load(&args.topics_file)?;
    info!(topics = topics.len(), "Loaded topic configuration");

    // Early check: the output directory must be writable before any
    // network traffic happens.
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // Unknown --topic is the one user-visible, run-aborting error.
    let selected: Vec<&Topic> = match &args.topic {
        Some(id) => match topics.get(id) {
            Some(topic) => vec![topic],
            None => {
                error!(topic = %id, available = ?topics.ids(), "Unknown topic id");
                return Err(Box::new(ConfigError::UnknownTopic(id.clone())));
            }
        },
        None => topics.iter().collect(),
    };

    // AI is a capability decided once at startup: either a client exists
    // or the summarizer is fallback-only.
    let api_key = if args.no_ai { None } else { args.api_key.clone() };
    let summarizer = Summarizer::from_config(&config.ai, &config.prompt, api_key)?;
    if !summarizer.ai_enabled() {
        info!("AI summarization disabled; using fallback generation");
    }

    let mut fetcher = Fetcher::new(&config.fetch)?;
    let mut cache = ContentCache::new();

    let mut all_cards: Vec<Card> = Vec::new();
    let mut summary = RunSummary {
        generated_at: Utc::now().to_rfc3339(),
        total_cards: 0,
        topics: Default::default(),
    };

    for topic in selected {
        info!(topic = %topic.id, title = %topic.title, urls = topic.urls.len(), pdfs = topic.pdfs.len(), "Processing topic");

        let documents = collect_documents(topic, &mut fetcher, &mut cache, &config).await;
        info!(topic = %topic.id, documents = documents.len(), "Collected source documents");

        let outcome = summarizer.summarize(topic, &documents).await;
        let source_urls: Vec<String> = documents.iter().map(|d| d.url.clone()).collect();

        let cards = assemble::assemble(&topics, &topic.id, &outcome, &source_urls)?;
        info!(topic = %topic.id, cards = cards.len(), method = %outcome.method, "Assembled cards");

        // Write failures are logged, not fatal: the remaining topics still
        // get their files.
        if let Err(e) = outputs::json::write_topic_cards(&cards, &args.output_dir, &topic.id).await
        {
            error!(topic = %topic.id, error = %e, "Failed writing topic card file");
        }

        summary.topics.insert(
            topic.id.clone(),
            TopicRunStats {
                title: topic.title.clone(),
                urls_attempted: topic.urls.len() + topic.pdfs.len(),
                documents: documents.len(),
                cards: cards.len(),
            },
        );
        summary.total_cards += cards.len();
        all_cards.extend(cards);
    }

    if let Err(e) = outputs::json::write_all_cards(&all_cards, &args.output_dir).await {
        error!(error = %e, "Failed writing aggregate card file");
    }
    if let Err(e) = outputs::summary::write_run_summary(&summary, &args.output_dir).await {
        error!(error = %e, "Failed writing run summary");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        cards = summary.total_cards,
        topics = summary.topics.len(),
        cached_urls = cache.len(),
        "Execution complete"
    );

    Ok(())
}

/// Fetch and extract every source for a topic, serially and politely.
///
/// Each URL goes through cache → fetch → extract → clean; every failure is
/// logged and the URL skipped. The returned documents are the complete
/// input for the topic's single summarization call.
#[instrument(level = "info", skip_all, fields(topic = %topic.id))]
async fn collect_documents(
    topic: &Topic,
    fetcher: &mut Fetcher,
    cache: &mut ContentCache,
    config: &PipelineConfig,
) -> Vec<SourceDocument> {
    let min_len = config.extract.min_text_len;
    let mut documents = Vec::new();

    for url in &topic.urls {
        if let Some(doc) = cache.get(url) {
            debug!(%url, "Using cached extraction");
            documents.push(doc.clone());
            continue;
        }
        match fetcher.fetch_html(url).await {
            Ok(html) => match extract::extract(url, &html, min_len) {
                Some(mut doc) => {
                    doc.text = clean::clean(&doc.text);
                    if doc.text.len() < min_len {
                        warn!(%url, chars = doc.text.len(), "Content too short after cleanup; skipping");
                        continue;
                    }
                    info!(%url, method = %doc.extraction_method, chars = doc.text.len(), "Extracted article");
                    cache.insert(doc.clone());
                    documents.push(doc);
                }
                None => {
                    warn!(%url, "No extraction strategy yielded enough text; skipping");
                }
            },
            Err(e) => {
                warn!(%url, error = %e, "Fetch failed; skipping");
            }
        }
    }

    for url in &topic.pdfs {
        if let Some(doc) = cache.get(url) {
            debug!(%url, "Using cached extraction");
            documents.push(doc.clone());
            continue;
        }
        match fetcher.fetch_pdf_text(url).await {
            Ok(text) => {
                let text = clean::clean(&text);
                match extract::document_from_pdf(url, text, min_len) {
                    Some(doc) => {
                        info!(%url, chars = doc.text.len(), "Extracted PDF text");
                        cache.insert(doc.clone());
                        documents.push(doc);
                    }
                    None => {
                        warn!(%url, "PDF text too short; skipping");
                    }
                }
            }
            Err(e) => {
                warn!(%url, error = %e, "PDF fetch failed; skipping");
            }
        }
    }

    documents
}
