//! JSON card files: one per topic, plus the aggregate file.

use crate::models::Card;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Write one topic's cards to `{output_dir}/{topic_id}.json`.
///
/// Called only after the topic's whole pipeline succeeded, so an
/// interrupted run never leaves a partially generated topic file behind.
#[instrument(level = "info", skip_all, fields(%topic_id, count = cards.len()))]
pub async fn write_topic_cards(
    cards: &[Card],
    output_dir: &str,
    topic_id: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(cards)?;
    fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join(format!("{topic_id}.json"));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote topic card file");
    Ok(path)
}

/// Write every card from the run to `{output_dir}/all_cards.json`.
#[instrument(level = "info", skip_all, fields(count = cards.len()))]
pub async fn write_all_cards(cards: &[Card], output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(cards)?;
    fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join("all_cards.json");
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote aggregate card file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationMethod;

    fn card(id: &str, title: &str) -> Card {
        Card {
            id: id.to_string(),
            topic_id: "sleep".to_string(),
            title: title.to_string(),
            subtitle: String::new(),
            tips: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            age_groups: vec!["2-4".to_string()],
            emoji: "🌙".to_string(),
            color_theme: "gentle_blue".to_string(),
            source_urls: vec![],
            generated_at: "2026-01-01T00:00:00+00:00".to_string(),
            generation_method: GenerationMethod::Template,
        }
    }

    #[tokio::test]
    async fn test_topic_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let cards = vec![card("sleep-0-a", "A"), card("sleep-1-b", "B")];

        let path = write_topic_cards(&cards, out, "sleep").await.unwrap();
        assert!(path.ends_with("sleep.json"));

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: Vec<Card> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].id, "sleep-0-a");
    }

    #[tokio::test]
    async fn test_rewrite_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();

        write_topic_cards(&[card("sleep-0-a", "A"), card("sleep-1-b", "B")], out, "sleep")
            .await
            .unwrap();
        let path = write_topic_cards(&[card("sleep-0-c", "C")], out, "sleep")
            .await
            .unwrap();

        let back: Vec<Card> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].id, "sleep-0-c");
    }

    #[tokio::test]
    async fn test_aggregate_file_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let path = write_all_cards(&[card("sleep-0-a", "A")], out).await.unwrap();
        assert!(path.ends_with("all_cards.json"));
        assert!(path.exists());
    }
}
