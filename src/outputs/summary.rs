//! The run summary file: per-topic counts plus a timestamp.

use crate::models::RunSummary;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Write the run summary to `{output_dir}/run_summary.json`.
#[instrument(level = "info", skip_all, fields(topics = summary.topics.len(), cards = summary.total_cards))]
pub async fn write_run_summary(
    summary: &RunSummary,
    output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join("run_summary.json");
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote run summary");
    Ok(path)
}
