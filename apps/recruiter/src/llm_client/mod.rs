//! LLM Client, the single point of entry for all text-generation calls.
//!
//! No agent or session talks to the model server directly. Agents depend on the
//! `TextGenerator` trait; `LlmClient` is the HTTP implementation for a locally
//! hosted llama.cpp server. It is constructed once in `main` and shared by `Arc`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmConfig;

#[cfg(test)]
pub mod mock;
pub mod prompts;

const COMPLETION_PATH: &str = "/completion";
const HEALTH_PATH: &str = "/health";

/// Defaults of the backend contract when an agent does not override them.
pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.95;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model server unavailable at {0}")]
    Unavailable(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One completion request: the prompt plus its sampling configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop: Vec<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            stop: Vec::new(),
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }
}

/// The backend seam. Implement this to swap model servers without touching
/// agents, sessions, or handlers.
///
/// A non-success MUST be reported as an error, never as an empty string.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
    stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    #[serde(default)]
    pub tokens_predicted: u32,
    #[serde(default)]
    pub tokens_evaluated: u32,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    error: ServerErrorBody,
}

#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    message: String,
}

/// HTTP client for a llama.cpp-compatible completion server.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    model: String,
    max_retries: u32,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true when the model server answers its health endpoint.
    pub async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}{HEALTH_PATH}", self.base_url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Makes a raw completion call, returning the full response object.
    /// Retries on 503 (model still loading) and other 5xx errors with exponential
    /// backoff, up to `max_retries` extra attempts (zero by default).
    pub async fn complete(
        &self,
        request: &GenerationRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let body = CompletionRequest {
            prompt: &request.prompt,
            n_predict: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stop: &request.stop,
            stream: false,
        };
        let url = format!("{}{COMPLETION_PATH}", self.base_url);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(5)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(&body).send().await {
                Ok(r) => r,
                Err(e) if e.is_connect() => {
                    last_error = Some(LlmError::Unavailable(self.base_url.clone()));
                    continue;
                }
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Model server returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: error_message(body),
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: error_message(body),
                });
            }

            let completion: CompletionResponse = serde_json::from_str(&response.text().await?)?;

            debug!(
                "LLM call succeeded: tokens_evaluated={}, tokens_predicted={}",
                completion.tokens_evaluated, completion.tokens_predicted
            );

            return Ok(completion);
        }

        Err(last_error.unwrap_or_else(|| LlmError::Unavailable(self.base_url.clone())))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let completion = self.complete(request).await?;
        non_empty(completion.content)
    }
}

/// Rejects blank completions so callers never record an empty message.
fn non_empty(content: String) -> Result<String, LlmError> {
    if content.trim().is_empty() {
        Err(LlmError::EmptyContent)
    } else {
        Ok(content.trim().to_string())
    }
}

/// Pulls the message out of a `{"error": {"message": ...}}` body, falling back to the raw text.
fn error_message(body: String) -> String {
    serde_json::from_str::<ServerError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_defaults_match_contract() {
        let request = GenerationRequest::new("hello");
        assert_eq!(request.max_tokens, 512);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert!((request.top_p - 0.95).abs() < f32::EPSILON);
        assert!(request.stop.is_empty());
    }

    #[test]
    fn test_request_builder_overrides() {
        let request = GenerationRequest::new("hello")
            .max_tokens(1024)
            .temperature(0.3)
            .stop(vec!["</s>".to_string()]);
        assert_eq!(request.max_tokens, 1024);
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(request.stop, vec!["</s>".to_string()]);
    }

    #[test]
    fn test_completion_body_omits_empty_stop() {
        let body = CompletionRequest {
            prompt: "p",
            n_predict: 16,
            temperature: 0.5,
            top_p: 0.9,
            stop: &[],
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("stop").is_none());
        assert_eq!(json["n_predict"], 16);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_completion_response_tolerates_missing_counters() {
        let parsed: CompletionResponse =
            serde_json::from_str(r#"{"content": "Hi there"}"#).unwrap();
        assert_eq!(parsed.content, "Hi there");
        assert_eq!(parsed.tokens_predicted, 0);
    }

    #[test]
    fn test_blank_completion_is_an_error() {
        assert!(matches!(non_empty("  \n".to_string()), Err(LlmError::EmptyContent)));
        assert_eq!(non_empty(" ok \n".to_string()).unwrap(), "ok");
    }

    #[test]
    fn test_error_message_prefers_structured_body() {
        let body = r#"{"error": {"code": 503, "message": "Loading model"}}"#.to_string();
        assert_eq!(error_message(body), "Loading model");
        assert_eq!(error_message("plain failure".to_string()), "plain failure");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let config = LlmConfig {
            base_url: "http://localhost:8080/".to_string(),
            model: "llama-3-8b-instruct".to_string(),
            timeout_secs: 5,
            max_retries: 0,
        };
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.model(), "llama-3-8b-instruct");
    }
}
