//! Command-line interface definitions.
//!
//! All options can be passed as flags; the API key can also come from the
//! `CARE_CARDS_API_KEY` environment variable. Without a key (or with
//! `--no-ai`) the pipeline runs fallback-only and still produces cards
//! for every topic.

use clap::Parser;

/// Command-line arguments for the card generation pipeline.
///
/// # Examples
///
/// ```sh
/// # Generate cards for every configured topic
/// parent_care_cards -t topics.json -o ./cards
///
/// # One topic only, without the AI summarizer
/// parent_care_cards -t topics.json -o ./cards --topic sleep --no-ai
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the card JSON files
    #[arg(short, long, default_value = "./cards")]
    pub output_dir: String,

    /// Path to the topics JSON file (array of topic objects)
    #[arg(short, long)]
    pub topics_file: String,

    /// Optional path to a pipeline settings YAML file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Process only this topic id
    #[arg(long)]
    pub topic: Option<String>,

    /// Disable the AI summarizer and force fallback generation
    #[arg(long)]
    pub no_ai: bool,

    /// API key for the completion endpoint
    #[arg(long, env = "CARE_CARDS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "parent_care_cards",
            "--topics-file",
            "./topics.json",
            "--output-dir",
            "./cards",
        ]);

        assert_eq!(cli.topics_file, "./topics.json");
        assert_eq!(cli.output_dir, "./cards");
        assert!(!cli.no_ai);
        assert!(cli.topic.is_none());
    }

    #[test]
    fn test_cli_short_flags_and_topic_filter() {
        let cli = Cli::parse_from([
            "parent_care_cards",
            "-t",
            "/tmp/topics.json",
            "-o",
            "/tmp/cards",
            "--topic",
            "sleep",
            "--no-ai",
        ]);

        assert_eq!(cli.topic.as_deref(), Some("sleep"));
        assert!(cli.no_ai);
    }

    #[test]
    fn test_output_dir_defaults() {
        let cli = Cli::parse_from(["parent_care_cards", "-t", "topics.json"]);
        assert_eq!(cli.output_dir, "./cards");
    }
}
