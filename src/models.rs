//! Data models for source articles, topics, and the advice cards we publish.
//!
//! The pipeline moves data through three shapes:
//! - [`SourceDocument`]: readable text extracted from one fetched URL
//! - [`TipSet`]: one card's worth of advice as produced by a summarizer
//! - [`Card`]: the persisted unit, a tip set merged with topic metadata
//!
//! [`Topic`] is the static configuration unit (curated URLs plus display
//! metadata); [`RunSummary`] is the per-run accounting record written next
//! to the card files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Readable text extracted from a single fetched URL.
///
/// Produced by the extractor, consumed by the summarizer in the same run.
/// Not persisted on its own, but cached in-process by URL so one invocation
/// never fetches the same page twice.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// The URL the content came from.
    pub url: String,
    /// Best-effort article title; `"Untitled"` when nothing better exists.
    pub title: String,
    /// Cleaned readable text.
    pub text: String,
    /// Which extraction strategy produced the text.
    pub extraction_method: ExtractionMethod,
    /// RFC 3339 timestamp of the fetch.
    pub fetched_at: String,
}

/// The extraction strategy that yielded a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Paragraph harvest from semantic `<article>`/`<main>` markup.
    Article,
    /// Readability main-content extraction.
    Readability,
    /// Manual CSS-selector chain, possibly the whole `<body>`.
    Selectors,
    /// Printable-text salvage from a PDF byte stream.
    Pdf,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExtractionMethod::Article => "article",
            ExtractionMethod::Readability => "readability",
            ExtractionMethod::Selectors => "selectors",
            ExtractionMethod::Pdf => "pdf",
        };
        f.write_str(s)
    }
}

/// A configured subject area: display metadata plus the curated source URLs.
///
/// Loaded once at startup from the topics JSON file and read-only for the
/// lifetime of a run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Topic {
    /// Unique key, e.g. `"tantrums"` or `"sleep"`.
    pub id: String,
    /// Human-readable title shown on cards.
    pub title: String,
    /// One-line context shown under the title.
    #[serde(default)]
    pub subtitle: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    #[serde(default = "default_color_theme")]
    pub color_theme: String,
    /// Age-range labels, e.g. `["2-4", "4-6"]`.
    #[serde(default = "default_age_groups")]
    pub age_groups: Vec<String>,
    /// Curated article URLs.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Optional PDF URLs (guides, printables).
    #[serde(default)]
    pub pdfs: Vec<String>,
}

fn default_emoji() -> String {
    "📌".to_string()
}

fn default_color_theme() -> String {
    "warm_purple".to_string()
}

fn default_age_groups() -> Vec<String> {
    vec!["2-4".to_string(), "4-6".to_string(), "6-8".to_string()]
}

/// One card's worth of advice as produced by a summarizer variant.
///
/// `age_groups` is optional on the wire: the AI is allowed to narrow the
/// topic's age groups per card, and the assembler falls back to the topic's
/// own labels when the field is empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TipSet {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub tips: Vec<String>,
    #[serde(default)]
    pub age_groups: Vec<String>,
}

/// Which summarizer path actually produced a card's content.
///
/// This reflects the path taken, not the path attempted: a failed AI call
/// that degraded to templates yields `Template`, never `Ai`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    Ai,
    Template,
    Extracted,
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GenerationMethod::Ai => "ai",
            GenerationMethod::Template => "template",
            GenerationMethod::Extracted => "extracted",
        };
        f.write_str(s)
    }
}

/// The persisted advice card shown to parents in the app.
///
/// Written once per run and superseded wholesale on the next run for the
/// same topic. Every card carries between 3 and 5 tips; the assembler
/// enforces that floor and ceiling.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Card {
    /// Stable identifier: `{topic_id}-{index}-{title-slug}`.
    pub id: String,
    pub topic_id: String,
    pub title: String,
    pub subtitle: String,
    pub tips: Vec<String>,
    pub age_groups: Vec<String>,
    pub emoji: String,
    pub color_theme: String,
    /// Up to three of the URLs whose content informed this card.
    pub source_urls: Vec<String>,
    /// RFC 3339 timestamp of generation.
    pub generated_at: String,
    pub generation_method: GenerationMethod,
}

/// Per-topic accounting for the run summary file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopicRunStats {
    pub title: String,
    /// URLs and PDFs we attempted to fetch.
    pub urls_attempted: usize,
    /// Source documents that survived extraction.
    pub documents: usize,
    /// Cards written for this topic.
    pub cards: usize,
}

/// The run summary written alongside the card files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub total_cards: usize,
    pub topics: BTreeMap<String, TopicRunStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_minimal_config_gets_defaults() {
        let json = r#"{
            "id": "sleep",
            "title": "Sleep & Bedtime",
            "urls": ["https://example.com/a"]
        }"#;

        let topic: Topic = serde_json::from_str(json).unwrap();
        assert_eq!(topic.id, "sleep");
        assert_eq!(topic.emoji, "📌");
        assert_eq!(topic.color_theme, "warm_purple");
        assert!(!topic.age_groups.is_empty());
        assert!(topic.pdfs.is_empty());
        assert_eq!(topic.subtitle, "");
    }

    #[test]
    fn test_generation_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&GenerationMethod::Ai).unwrap(),
            "\"ai\""
        );
        assert_eq!(
            serde_json::to_string(&GenerationMethod::Template).unwrap(),
            "\"template\""
        );
        assert_eq!(
            serde_json::to_string(&GenerationMethod::Extracted).unwrap(),
            "\"extracted\""
        );
    }

    #[test]
    fn test_card_round_trip() {
        let card = Card {
            id: "sleep-0-consistent-bedtime".to_string(),
            topic_id: "sleep".to_string(),
            title: "Consistent Bedtime".to_string(),
            subtitle: "Predictability signals sleep".to_string(),
            tips: vec![
                "Tip one.".to_string(),
                "Tip two.".to_string(),
                "Tip three.".to_string(),
            ],
            age_groups: vec!["2-4".to_string()],
            emoji: "🌙".to_string(),
            color_theme: "gentle_blue".to_string(),
            source_urls: vec!["https://example.com/a".to_string()],
            generated_at: "2026-01-01T00:00:00+00:00".to_string(),
            generation_method: GenerationMethod::Template,
        };

        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, card.id);
        assert_eq!(back.generation_method, GenerationMethod::Template);
        assert_eq!(back.tips.len(), 3);
    }

    #[test]
    fn test_tip_set_age_groups_default_empty() {
        let json = r#"{
            "title": "Stay Calm First",
            "subtitle": "Your calm is their anchor",
            "tips": ["a", "b", "c"]
        }"#;

        let set: TipSet = serde_json::from_str(json).unwrap();
        assert!(set.age_groups.is_empty());
        assert_eq!(set.tips.len(), 3);
    }
}
