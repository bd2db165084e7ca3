//! Configuration loading: the topics file and the pipeline settings file.
//!
//! Topics come from a JSON file listing every subject area with its curated
//! URLs and display metadata. Pipeline settings (HTTP behavior, extraction
//! threshold, AI endpoint, prompt budget) come from an optional YAML file;
//! every field has a default so the pipeline runs with no settings file at
//! all.

use crate::models::Topic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration or resolving topic ids.
///
/// [`ConfigError::UnknownTopic`] is the one user-visible, run-aborting
/// error in the pipeline: every other failure is logged and skipped.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("unknown topic id: {0}")]
    UnknownTopic(String),
}

/// The configured topics, in file order.
#[derive(Debug, Clone)]
pub struct TopicSet {
    topics: Vec<Topic>,
}

impl TopicSet {
    /// Load topics from a JSON file containing an array of topic objects.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let topics: Vec<Topic> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_topics(topics))
    }

    pub fn from_topics(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// Look up a topic by id.
    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Iterate topics in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// All configured topic ids, for "unknown topic" error messages.
    pub fn ids(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.id.as_str()).collect()
    }
}

/// HTTP fetching behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User agent sent with every request and matched against robots.txt.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Politeness delay range in milliseconds, sampled uniformly before
    /// each network call.
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    /// Consult robots.txt before fetching.
    pub respect_robots: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "ParentCareCardsBot/0.1 (content pipeline)".to_string(),
            timeout_secs: 30,
            delay_min_ms: 500,
            delay_max_ms: 1500,
            respect_robots: true,
        }
    }
}

/// Extraction acceptance rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Minimum extracted-text length in bytes; candidates at exactly this
    /// length are accepted, one below is rejected.
    pub min_text_len: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { min_text_len: 300 }
    }
}

/// The OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AiConfig {
    /// Base URL; the client POSTs to `{base_url}/chat/completions`.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Bounded retries for HTTP 429 replies. Other failures never retry.
    pub max_rate_limit_retries: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1800,
            max_rate_limit_retries: 3,
        }
    }
}

/// Character budget for the summarization prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Cap on the combined source excerpts embedded in one prompt.
    pub max_prompt_chars: usize,
    /// Per-document excerpt cap, applied before whole documents are
    /// dropped from the tail.
    pub per_document_chars: usize,
    /// At most this many documents are embedded.
    pub max_documents: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_prompt_chars: 7000,
            per_document_chars: 2000,
            max_documents: 5,
        }
    }
}

/// All pipeline settings, loadable from YAML with full defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
    pub ai: AiConfig,
    pub prompt: PromptConfig,
}

impl PipelineConfig {
    /// Load settings from a YAML file, or return defaults when no path is
    /// given.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_topic_set_lookup_and_order() {
        let topics = vec![
            Topic {
                id: "sleep".to_string(),
                title: "Sleep & Bedtime".to_string(),
                subtitle: String::new(),
                emoji: "🌙".to_string(),
                color_theme: "gentle_blue".to_string(),
                age_groups: vec!["2-4".to_string()],
                urls: vec!["https://example.com/a".to_string()],
                pdfs: vec![],
            },
            Topic {
                id: "tantrums".to_string(),
                title: "Tantrums".to_string(),
                subtitle: String::new(),
                emoji: "🌪️".to_string(),
                color_theme: "calm_orange".to_string(),
                age_groups: vec!["2-4".to_string()],
                urls: vec![],
                pdfs: vec![],
            },
        ];
        let set = TopicSet::from_topics(topics);

        assert_eq!(set.len(), 2);
        assert!(set.get("sleep").is_some());
        assert!(set.get("unknown_topic_xyz").is_none());
        let ids: Vec<&str> = set.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["sleep", "tantrums"]);
    }

    #[test]
    fn test_topic_set_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "sleep", "title": "Sleep & Bedtime",
                  "urls": ["https://example.com/a"],
                  "pdfs": ["https://example.com/guide.pdf"]}}
            ]"#
        )
        .unwrap();

        let set = TopicSet::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("sleep").unwrap().pdfs.len(), 1);
    }

    #[test]
    fn test_topic_set_load_bad_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = TopicSet::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_pipeline_config_defaults() {
        let config = PipelineConfig::load(None).unwrap();
        assert_eq!(config.extract.min_text_len, 300);
        assert_eq!(config.ai.max_rate_limit_retries, 3);
        assert!(config.fetch.delay_min_ms <= config.fetch.delay_max_ms);
        assert_eq!(config.prompt.max_prompt_chars, 7000);
    }

    #[test]
    fn test_pipeline_config_partial_yaml_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "fetch:\n  respect_robots: false\nextract:\n  min_text_len: 300\nai:\n  model: test-model\n"
        )
        .unwrap();

        let config = PipelineConfig::load(Some(file.path().to_str().unwrap())).unwrap();
        assert!(!config.fetch.respect_robots);
        assert_eq!(config.ai.model, "test-model");
        // Untouched sections keep their defaults.
        assert_eq!(config.prompt.per_document_chars, 2000);
    }
}
