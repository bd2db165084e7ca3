//! Heuristic tip extraction from cleaned source text.
//!
//! The extraction sub-strategy turns real scraped sentences into tips when
//! the AI path is unavailable: split into sentences, keep the ones that
//! look like actionable parenting advice, and group consecutive keepers
//! into tip-sized chunks. It either produces a full 3-5 tip set or nothing
//! at all; a thin result is discarded so the template sub-strategy can
//! take over.

use crate::models::{SourceDocument, TipSet, Topic};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentences outside this byte-length band are headlines or walls of text,
/// not tips.
const MIN_SENTENCE_LEN: usize = 50;
const MAX_SENTENCE_LEN: usize = 350;

/// Tips are built from 2-3 consecutive sentences, stopping early once a
/// chunk is comfortably tip-sized.
const MAX_SENTENCES_PER_TIP: usize = 3;
const TARGET_TIP_LEN: usize = 250;
const MIN_TIP_LEN: usize = 100;
const MAX_TIPS: usize = 5;
const MIN_TIPS: usize = 3;

/// Words that mark a sentence as parenting advice rather than site chrome.
static KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "help", "child", "children", "parent", "try", "give", "let", "make", "allow",
        "encourage", "teach", "show", "create", "build", "develop", "support",
        "practice", "use", "avoid", "remember", "important", "toddler", "kid",
        "sleep", "eat", "feel", "emotion", "behavior", "routine", "consistent",
        "calm", "patient", "love", "understand", "validate", "when", "if",
        "because", "research", "study", "expert",
    ]
});

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s+").unwrap());

const LINKING_STARTS: [&str; 5] = ["and ", "but ", "or ", "so ", "also "];

/// Split text into trimmed sentences, keeping end punctuation.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    for m in SENTENCE_END.find_iter(text) {
        let punct_len = m.as_str().trim_end().len();
        let sentence = text[start..m.start() + punct_len].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn is_meaningful(sentence: &str) -> bool {
    let len = sentence.len();
    if len <= MIN_SENTENCE_LEN || len >= MAX_SENTENCE_LEN {
        return false;
    }
    let lower = sentence.to_lowercase();
    if LINKING_STARTS.iter().any(|w| lower.starts_with(w)) {
        return false;
    }
    KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Sentences from the combined source text that qualify as tip material.
pub fn meaningful_sentences(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .filter(|s| is_meaningful(s))
        .map(|s| s.to_string())
        .unique()
        .collect()
}

/// Group qualifying sentences into up to five tips of 2-3 sentences each.
///
/// Returns `None` when fewer than three tips can be assembled; the caller
/// then falls back to templates rather than publishing a thin card.
pub fn tips_from_sentences(sentences: &[String]) -> Option<Vec<String>> {
    let mut tips: Vec<String> = Vec::new();
    let mut iter = sentences.iter().peekable();

    while tips.len() < MAX_TIPS {
        let Some(first) = iter.next() else { break };
        let mut tip = first.clone();
        let mut count = 1;
        while count < MAX_SENTENCES_PER_TIP && tip.len() < TARGET_TIP_LEN {
            let Some(next) = iter.peek() else { break };
            tip.push(' ');
            tip.push_str(next.as_str());
            iter.next();
            count += 1;
        }
        if !tip.ends_with(['.', '!', '?']) {
            tip.push('.');
        }
        if tip.len() >= MIN_TIP_LEN {
            tips.push(tip);
        }
    }

    if tips.len() >= MIN_TIPS { Some(tips) } else { None }
}

/// Run the extraction sub-strategy over a topic's source documents.
pub fn extracted_tip_set(topic: &Topic, documents: &[SourceDocument]) -> Option<TipSet> {
    if documents.is_empty() {
        return None;
    }
    let combined = documents.iter().map(|d| d.text.as_str()).join("\n\n");
    let sentences = meaningful_sentences(&combined);
    let tips = tips_from_sentences(&sentences)?;

    let subtitle = if topic.subtitle.is_empty() {
        format!("Practical guidance on {}", topic.title.to_lowercase())
    } else {
        topic.subtitle.clone()
    };

    Some(TipSet {
        title: topic.title.clone(),
        subtitle,
        tips,
        age_groups: topic.age_groups.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionMethod;

    fn advice_text() -> String {
        [
            "Help your child name big feelings before you try to fix the situation for them at all.",
            "Children thrive when parents keep a consistent and calm bedtime routine every single night.",
            "Try to give your toddler two simple choices so they keep a small sense of control over things.",
            "Encourage your child to practice deep breathing when they feel overwhelmed by their emotions.",
            "Teach children that mistakes are part of learning and show them how you handle your own calmly.",
            "Remember that every parent needs support sometimes, and asking for help is important for you too.",
            "Let your child help with small household tasks because contribution helps them develop confidence.",
            "Avoid labeling your child as shy or picky since children tend to live up to the labels we use.",
            "When your child is upset, validate the emotion first and save the behavior lesson for later.",
            "Use a visual routine chart so your child can see what comes next and feel secure in the day.",
        ]
        .join(" ")
    }

    fn doc(text: &str) -> SourceDocument {
        SourceDocument {
            url: "https://example.com/a".to_string(),
            title: "Advice".to_string(),
            text: text.to_string(),
            extraction_method: ExtractionMethod::Article,
            fetched_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn topic() -> Topic {
        Topic {
            id: "behavior".to_string(),
            title: "Positive Behavior".to_string(),
            subtitle: String::new(),
            emoji: "🎯".to_string(),
            color_theme: "warm_purple".to_string(),
            age_groups: vec!["2-4".to_string(), "4-6".to_string()],
            urls: vec![],
            pdfs: vec![],
        }
    }

    #[test]
    fn test_split_sentences_keeps_punctuation() {
        let sentences = split_sentences("First one here. Second one! Third?");
        assert_eq!(sentences, vec!["First one here.", "Second one!", "Third?"]);
    }

    #[test]
    fn test_meaningful_filters_by_band_and_keywords() {
        let text = "Short. \
            Help your child name feelings before you try to fix anything for them today. \
            And this one starts with a linking word even though it mentions your child clearly. \
            Quarterly revenue increased across all reporting segments according to the filing overall.";
        let kept = meaningful_sentences(text);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].starts_with("Help your child"));
    }

    #[test]
    fn test_meaningful_rejects_overlong_sentences() {
        let long = format!("Help your child {}.", "very ".repeat(80));
        assert!(long.len() >= 350);
        assert!(meaningful_sentences(&long).is_empty());
    }

    #[test]
    fn test_tips_grouped_in_two_to_three_sentences() {
        let set = extracted_tip_set(&topic(), &[doc(&advice_text())]).unwrap();
        assert!((3..=5).contains(&set.tips.len()));
        for tip in &set.tips {
            assert!(tip.len() >= MIN_TIP_LEN);
            assert!(tip.ends_with(['.', '!', '?']));
        }
        assert_eq!(set.age_groups, vec!["2-4", "4-6"]);
        assert_eq!(set.title, "Positive Behavior");
        assert!(set.subtitle.contains("positive behavior"));
    }

    #[test]
    fn test_thin_material_is_discarded() {
        let thin = "Help your child name big feelings before you try to fix the situation for them.";
        assert!(extracted_tip_set(&topic(), &[doc(thin)]).is_none());
    }

    #[test]
    fn test_no_documents_yields_none() {
        assert!(extracted_tip_set(&topic(), &[]).is_none());
    }

    #[test]
    fn test_duplicate_sentences_deduplicated() {
        let repeated = format!("{} {}", advice_text(), advice_text());
        let unique_count = meaningful_sentences(&advice_text()).len();
        assert_eq!(meaningful_sentences(&repeated).len(), unique_count);
    }
}
