//! Card assembly: merge summarizer output with topic metadata.
//!
//! The assembler is the last gate before persistence. It rejects unknown
//! topic ids (the only run-aborting error in the pipeline), enforces the
//! 3-5 tip invariant on every card, and stamps each card with the
//! generation method the summarizer actually used.

use crate::config::{ConfigError, TopicSet};
use crate::models::Card;
use crate::summarize::SummaryOutcome;
use crate::utils::slugify_title;
use chrono::Utc;
use itertools::Itertools;
use tracing::{instrument, warn};

/// Build persistable cards for a topic from a summarization outcome.
///
/// Fails only when `topic_id` is not configured; otherwise total. Card ids
/// are deterministic (`{topic_id}-{index}-{title-slug}`) so re-runs over
/// unchanged content produce identical identifiers.
#[instrument(level = "info", skip_all, fields(topic = %topic_id))]
pub fn assemble(
    topics: &TopicSet,
    topic_id: &str,
    outcome: &SummaryOutcome,
    source_urls: &[String],
) -> Result<Vec<Card>, ConfigError> {
    let topic = topics
        .get(topic_id)
        .ok_or_else(|| ConfigError::UnknownTopic(topic_id.to_string()))?;

    let generated_at = Utc::now().to_rfc3339();
    let sources: Vec<String> = source_urls.iter().take(3).cloned().collect();

    let mut cards = Vec::new();
    for (index, set) in outcome.tip_sets.iter().enumerate() {
        let tips: Vec<String> = set
            .tips
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unique()
            .take(5)
            .collect();
        if tips.len() < 3 {
            warn!(card = %set.title, tips = tips.len(), "Skipping tip set below the 3-tip floor");
            continue;
        }

        let age_groups = if set.age_groups.is_empty() {
            topic.age_groups.clone()
        } else {
            set.age_groups.clone()
        };

        cards.push(Card {
            id: format!("{}-{}-{}", topic.id, index, slugify_title(&set.title)),
            topic_id: topic.id.clone(),
            title: set.title.clone(),
            subtitle: set.subtitle.clone(),
            tips,
            age_groups,
            emoji: topic.emoji.clone(),
            color_theme: topic.color_theme.clone(),
            source_urls: sources.clone(),
            generated_at: generated_at.clone(),
            generation_method: outcome.method,
        });
    }

    Ok(cards)
}
