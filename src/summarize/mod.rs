//! Card-content summarization: AI first, heuristic extraction second,
//! hand-authored templates as the unconditional safety net.
//!
//! # Submodules
//!
//! - [`ai`]: the OpenAI-compatible client and rate-limit backoff
//! - [`fallback`]: sentence-extraction sub-strategy over scraped text
//! - [`templates`]: static per-topic card sets
//!
//! The selection policy lives in [`Summarizer::summarize`]: the AI variant
//! runs only when a client is configured and at least one source document
//! exists; any AI failure (transport, malformed JSON, no valid cards)
//! degrades silently to the fallback chain. Summarization therefore never
//! fails and every topic always yields at least one card.

pub mod ai;
pub mod fallback;
pub mod templates;

use crate::config::{AiConfig, PromptConfig};
use crate::models::{GenerationMethod, SourceDocument, TipSet, Topic};
use crate::utils::{looks_truncated, truncate_for_log};
use ai::{AiClient, AiError, GenerateAsync, RetryRateLimited};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why an AI summarization attempt produced nothing usable.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Api(#[from] AiError),
    #[error("reply was not valid card JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("reply parsed but contained no card with 3-5 tips")]
    NoUsableCards,
}

/// The tip sets for one topic plus the path that actually produced them.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub tip_sets: Vec<TipSet>,
    pub method: GenerationMethod,
}

#[derive(Debug, Deserialize)]
struct CardBatch {
    #[serde(default)]
    cards: Vec<TipSet>,
}

/// Topic summarizer, polymorphic over the completion client so tests can
/// substitute a double. Production code uses [`Summarizer<AiClient>`] via
/// [`Summarizer::from_config`].
pub struct Summarizer<C = AiClient> {
    client: Option<C>,
    prompt: PromptConfig,
    max_rate_limit_retries: usize,
}

impl Summarizer<AiClient> {
    /// Build the production summarizer. `api_key: None` (or `--no-ai`)
    /// yields a fallback-only summarizer: an absent client, not a flag
    /// checked at call sites.
    pub fn from_config(
        ai_config: &AiConfig,
        prompt: &PromptConfig,
        api_key: Option<String>,
    ) -> Result<Self, AiError> {
        let client = match api_key {
            Some(key) => Some(AiClient::new(ai_config, key)?),
            None => None,
        };
        Ok(Self {
            client,
            prompt: prompt.clone(),
            max_rate_limit_retries: ai_config.max_rate_limit_retries,
        })
    }
}

impl<C> Summarizer<C>
where
    C: GenerateAsync,
{
    pub fn with_client(client: Option<C>, prompt: PromptConfig, max_rate_limit_retries: usize) -> Self {
        Self {
            client,
            prompt,
            max_rate_limit_retries,
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Produce tip sets for a topic. Total: every failure path lands on
    /// the template sub-strategy.
    #[instrument(level = "info", skip_all, fields(topic = %topic.id, documents = documents.len()))]
    pub async fn summarize(&self, topic: &Topic, documents: &[SourceDocument]) -> SummaryOutcome {
        if let Some(client) = &self.client {
            if documents.is_empty() {
                info!("No source documents; skipping AI variant");
            } else {
                match self.ai_tip_sets(client, topic, documents).await {
                    Ok(tip_sets) => {
                        info!(cards = tip_sets.len(), "AI summarization succeeded");
                        return SummaryOutcome {
                            tip_sets,
                            method: GenerationMethod::Ai,
                        };
                    }
                    Err(e) => {
                        warn!(error = %e, "AI summarization failed; falling back");
                    }
                }
            }
        }

        if let Some(set) = fallback::extracted_tip_set(topic, documents) {
            info!(tips = set.tips.len(), "Using extracted tips");
            return SummaryOutcome {
                tip_sets: vec![set],
                method: GenerationMethod::Extracted,
            };
        }

        info!("Using template cards");
        SummaryOutcome {
            tip_sets: templates::template_tip_sets(&topic.id),
            method: GenerationMethod::Template,
        }
    }

    async fn ai_tip_sets(
        &self,
        client: &C,
        topic: &Topic,
        documents: &[SourceDocument],
    ) -> Result<Vec<TipSet>, SummarizeError> {
        let prompt = build_prompt(topic, documents, &self.prompt);
        let retrying =
            RetryRateLimited::new(client, self.max_rate_limit_retries, Duration::from_secs(1));
        let reply = retrying.generate(&prompt).await?;
        parse_card_reply(&reply)
    }
}

/// Parse a completion reply into validated tip sets.
///
/// Parse failures are terminal for the AI variant and are never retried
/// against the API.
pub fn parse_card_reply(reply: &str) -> Result<Vec<TipSet>, SummarizeError> {
    let json = strip_code_fence(reply);
    let batch: CardBatch = serde_json::from_str(json).map_err(|e| {
        if looks_truncated(&e) {
            warn!(
                reply_preview = %truncate_for_log(reply, 200),
                "Reply looks truncated (EOF while parsing)"
            );
        }
        SummarizeError::Parse(e)
    })?;

    let mut tip_sets = Vec::new();
    for mut set in batch.cards {
        set.tips.retain(|t| !t.trim().is_empty());
        set.tips.truncate(5);
        if set.tips.len() < 3 {
            warn!(card = %set.title, tips = set.tips.len(), "Dropping AI card with too few tips");
            continue;
        }
        if set.title.trim().is_empty() {
            warn!("Dropping AI card with empty title");
            continue;
        }
        tip_sets.push(set);
    }

    if tip_sets.is_empty() {
        return Err(SummarizeError::NoUsableCards);
    }
    Ok(tip_sets)
}

/// Strip an optional markdown code fence from a model reply.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => return trimmed,
    };
    rest.rsplit_once("```")
        .map(|(body, _)| body.trim())
        .unwrap_or_else(|| rest.trim())
}

/// Build the summarization prompt: topic context plus length-bounded
/// source excerpts.
///
/// Each document is first cut to the per-document cap; whole documents are
/// then dropped from the tail until the combined excerpts fit the total
/// budget. Earlier documents are never shortened to make room for later
/// ones.
pub fn build_prompt(topic: &Topic, documents: &[SourceDocument], config: &PromptConfig) -> String {
    let mut knowledge = String::new();
    let mut used = 0usize;
    for doc in documents.iter().take(config.max_documents) {
        let excerpt = truncate_chars(&doc.text, config.per_document_chars);
        let block = format!("SOURCE: {}\n{}\n\n", doc.title, excerpt);
        if used + block.len() > config.max_prompt_chars {
            break;
        }
        used += block.len();
        knowledge.push_str(&block);
    }

    format!(
        "You are a child development expert writing advice cards for a parenting app.\n\n\
         TOPIC: {title}\n\
         AGE GROUPS: {ages}\n\n\
         Based on the research below, write 5 advice cards.\n\n\
         KNOWLEDGE:\n{knowledge}\n\
         REQUIREMENTS:\n\
         1. Each card needs a catchy title (3-5 words)\n\
         2. Each card needs a one-sentence subtitle\n\
         3. Each card needs exactly 5 tips, each 2-3 sentences, concrete and actionable\n\
         4. Speak directly to parents with \"you/your\" language, warm and encouraging\n\
         5. Rewrite everything in original words; never copy the sources\n\n\
         Return ONLY valid JSON in this shape:\n\
         {{\"cards\": [{{\"title\": \"...\", \"subtitle\": \"...\", \"tips\": [\"...\"], \"age_groups\": [\"{first_age}\"]}}]}}",
        title = topic.title,
        ages = topic.age_groups.join(", "),
        knowledge = knowledge,
        first_age = topic.age_groups.first().map(String::as_str).unwrap_or("2-4"),
    )
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
