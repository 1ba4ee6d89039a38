//! LLM answer-generation service
//!
//! Thin client for an OpenAI-compatible `/chat/completions` endpoint (Groq in
//! production). The prompt is sent as a single user message at low
//! temperature. Transient failures (timeouts, 429, 5xx) are retried a bounded
//! number of times with growing backoff; auth and other client errors are
//! surfaced immediately.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::errors::BlinkRagError;
use crate::errors::Result;

/// One message in a chat-completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Seam for answer generation so tests can substitute a scripted fake
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str, temperature: f32, max_tokens: usize) -> Result<String>;
}

/// Client for the remote text-generation service
pub struct LlmService {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_retries: usize,
}

struct AttemptFailure {
    retryable: bool,
    error: BlinkRagError,
}

impl LlmService {
    /// Create a new LLM service from configuration
    ///
    /// # Errors
    /// - Missing API key (neither config nor GROQ_API_KEY set)
    /// - HTTP client build errors
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        let api_key = config.llm_key()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()
            .map_err(|e| BlinkRagError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.llm_endpoint().trim_end_matches('/').to_string(),
            api_key,
            model: config.llm_model().to_string(),
            max_retries: config.llm.max_retries.max(1),
        })
    }

    /// Generate a completion with explicit sampling parameters
    ///
    /// # Errors
    /// - `GenerationError` after the bounded retries are exhausted or on a
    ///   non-retryable API failure
    pub async fn generate_with_params(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        for attempt in 1..=self.max_retries {
            match self.request_completion(prompt, temperature, max_tokens).await {
                Ok(text) => return Ok(text),
                Err(failure) => {
                    warn!(
                        "Attempt {}/{}: generation request failed: {}",
                        attempt, self.max_retries, failure.error
                    );
                    if failure.retryable && attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
                        continue;
                    }
                    return Err(failure.error);
                }
            }
        }

        Err(BlinkRagError::GenerationError(
            "generation retries exhausted".to_string(),
        ))
    }

    /// Get the configured model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request_completion(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> std::result::Result<String, AttemptFailure> {
        #[derive(Serialize)]
        struct CompletionRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: usize,
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: String,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {} ({})", url, self.model);

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(prompt)],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AttemptFailure {
                retryable: e.is_timeout() || e.is_connect() || e.is_request(),
                error: BlinkRagError::HttpError(e.to_string()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AttemptFailure {
                retryable: status.as_u16() == 429 || status.is_server_error(),
                error: BlinkRagError::GenerationError(format!(
                    "completion API error ({status}): {error_text}"
                )),
            });
        }

        let result: CompletionResponse = response.json().await.map_err(|e| AttemptFailure {
            retryable: false,
            error: BlinkRagError::GenerationError(format!("Failed to parse response: {e}")),
        })?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AttemptFailure {
                retryable: false,
                error: BlinkRagError::GenerationError("No completion in response".to_string()),
            })
    }
}

impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str, temperature: f32, max_tokens: usize) -> Result<String> {
        self.generate_with_params(prompt, temperature, max_tokens).await
    }
}
