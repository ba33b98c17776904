/// LLM Client: the single point of entry for all completion-service calls in ScholarLens.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Pipelines depend on the `CompletionService` trait; `LlmClient` is the production
/// implementation, constructed once in `main` and injected through `AppState`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in ScholarLens.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One request/response call against the completion service.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The completion-service seam. Implement this to swap the backend (tests use a
/// scripted fake) without touching any pipeline code.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the raw text body of the reply.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError>;
}

/// Calls the service and deserializes the reply as JSON of shape `T`.
/// Markdown code fences around the JSON are stripped first.
pub async fn complete_json<T: DeserializeOwned>(
    llm: &dyn CompletionService,
    request: CompletionRequest<'_>,
) -> Result<T, LlmError> {
    let text = llm.complete(request).await?;
    let text = strip_json_fences(&text);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    serde_json::from_str(text).map_err(LlmError::Parse)
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client with an optional, explicit retry budget.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    max_retries: u32,
}

/// Outcome of a failed attempt: whether another attempt may succeed.
#[derive(Debug)]
enum Failure {
    Retryable(LlmError),
    Fatal(LlmError),
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration, max_retries: u32) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint: ANTHROPIC_API_URL.to_string(),
            max_retries,
        })
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    /// With `max_retries > 0`, retries 429/5xx and transport errors with exponential backoff.
    pub async fn call(&self, request: CompletionRequest<'_>) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        let mut retry = 0;
        loop {
            match self.attempt(&request_body).await {
                Ok(response) => return Ok(response),
                Err(Failure::Fatal(e)) => return Err(e),
                Err(Failure::Retryable(e)) if retry >= self.max_retries => return Err(e),
                Err(Failure::Retryable(e)) => {
                    retry += 1;
                    let delay = backoff_delay(retry);
                    warn!(
                        "LLM call failed ({e}), retry {retry}/{} in {}ms",
                        self.max_retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn attempt(&self, body: &AnthropicRequest<'_>) -> Result<LlmResponse, Failure> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Failure::Retryable(transport_error(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let llm_response: LlmResponse = response
            .json()
            .await
            .map_err(|e| Failure::Fatal(transport_error(e)))?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );
        Ok(llm_response)
    }
}

/// Rate limits and server errors are worth another attempt; any other
/// non-success status is final. The API's error message is preferred over the
/// raw body when the body carries one.
fn classify_status(status: StatusCode, body: String) -> Failure {
    let message = serde_json::from_str::<AnthropicError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    let error = LlmError::Api {
        status: status.as_u16(),
        message,
    };
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Failure::Retryable(error)
    } else {
        Failure::Fatal(error)
    }
}

fn transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Http(e)
    }
}

/// Delay before retry `n` (1-based): 1s, 2s, 4s, ... capped at 64s.
fn backoff_delay(retry: u32) -> Duration {
    Duration::from_millis(1000 << retry.saturating_sub(1).min(6))
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let response = self.call(request).await?;
        response
            .text()
            .map(str::to_owned)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Extracts the body of the first ``` fenced block (with or without a `json` tag).
/// Text without fences is returned trimmed.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(open) = text.find("```") else {
        return text;
    };
    let after = &text[open + 3..];
    let body = after
        .strip_prefix("json")
        .or_else(|| after.strip_prefix("JSON"))
        .unwrap_or(after);
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}
