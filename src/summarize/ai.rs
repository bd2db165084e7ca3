//! OpenAI-compatible completion client with bounded rate-limit backoff.
//!
//! The client is deliberately thin: one POST to `chat/completions`, typed
//! errors, and a decorator that retries *only* HTTP 429 replies. Malformed
//! replies are a parsing concern handled one level up and are never
//! retried against the API.
//!
//! # Backoff strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```
//!
//! At most three rate-limit retries; exhaustion surfaces as
//! [`AiError::RateLimited`] and the summarizer degrades to its fallback.

use crate::config::AiConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

/// Errors from the completion endpoint.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("rate limited by the completion endpoint")]
    RateLimited,
    #[error("completion endpoint returned HTTP {0}")]
    HttpStatus(u16),
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion reply contained no content")]
    EmptyReply,
}

impl AiError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AiError::RateLimited)
    }
}

/// Async text generation, implemented by the real client and by test
/// doubles. The decorators below work against this trait.
pub trait GenerateAsync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AiClient {
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

impl GenerateAsync for AiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let t0 = Instant::now();
        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            return Err(AiError::HttpStatus(status.as_u16()));
        }

        let body: ChatResponse = resp.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AiError::EmptyReply)?;

        tracing::debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            chars = content.len(),
            "Completion received"
        );
        Ok(content)
    }
}

/// Decorator that retries rate-limited calls with exponential backoff and
/// jitter. Any other error returns immediately.
pub struct RetryRateLimited<'a, T> {
    inner: &'a T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<'a, T> RetryRateLimited<'a, T>
where
    T: GenerateAsync,
{
    pub fn new(inner: &'a T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<'a, T> GenerateAsync for RetryRateLimited<'a, T>
where
    T: GenerateAsync,
{
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let mut attempt = 0usize;
        loop {
            match self.inner.generate(prompt).await {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_rate_limited() => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        warn!(attempt, max = self.max_retries, "Rate-limit retries exhausted");
                        return Err(e);
                    }
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rand::rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);
                    warn!(attempt, max = self.max_retries, ?delay, "Rate limited; backing off");
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test double that fails `failures` times before succeeding.
    struct FlakyClient {
        calls: AtomicUsize,
        failures: usize,
        error: fn() -> AiError,
    }

    impl FlakyClient {
        fn rate_limited(failures: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures,
                error: || AiError::RateLimited,
            }
        }

        fn server_error(failures: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures,
                error: || AiError::HttpStatus(500),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GenerateAsync for FlakyClient {
        async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err((self.error)())
            } else {
                Ok("{\"cards\": []}".to_string())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_through_three_rate_limits() {
        let client = FlakyClient::rate_limited(3);
        let retrying = RetryRateLimited::new(&client, 3, Duration::from_secs(1));
        let reply = retrying.generate("prompt").await.unwrap();
        assert_eq!(reply, "{\"cards\": []}");
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_retry_bound() {
        let client = FlakyClient::rate_limited(10);
        let retrying = RetryRateLimited::new(&client, 3, Duration::from_secs(1));
        let err = retrying.generate("prompt").await.unwrap_err();
        assert!(err.is_rate_limited());
        // Initial attempt plus three retries, never more.
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_rate_limit_errors_never_retry() {
        let client = FlakyClient::server_error(1);
        let retrying = RetryRateLimited::new(&client, 3, Duration::from_secs(1));
        let err = retrying.generate("prompt").await.unwrap_err();
        assert!(matches!(err, AiError::HttpStatus(500)));
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_client_trims_trailing_slash_from_base_url() {
        let config = AiConfig {
            base_url: "https://api.example.com/v1/".to_string(),
            ..AiConfig::default()
        };
        let client = AiClient::new(&config, "key".to_string()).unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }
}
