//! Summarization client for the text-summarization model
//!
//! Defines the client trait the field extractor talks to. Two implementations:
//! - `HttpSummarizer`: posts prompts to a Hugging Face style inference endpoint (production)
//! - `MockSummarizer`: returns preconfigured responses keyed by prompt prefix (testing)
//!
//! The production client is a process-wide singleton created on first use by
//! [`shared`] and held for the lifetime of the process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Environment variable that overrides the configured API token
pub const API_TOKEN_ENV: &str = "HF_API_TOKEN";

/// Errors from summarization requests.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("summarizer not available: {0}")]
    Unavailable(String),
    #[error("summarization request failed: {0}")]
    Request(String),
    #[error("summarizer returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("summarization request timed out")]
    Timeout,
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("summarizer returned an empty summary")]
    EmptyResponse,
}

/// Client trait for the summarization model.
///
/// Abstracts over transport (HTTP, mock) so the extractor doesn't depend on
/// how the model is reached.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `prompt` into text bounded by `min_length..=max_length` tokens.
    async fn summarize(
        &self,
        prompt: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, SummarizeError>;
}

/// Connection and generation settings for the summarization model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Base URL of the inference service; the model name is appended
    pub endpoint: String,
    pub model: String,
    /// Bearer token; `HF_API_TOKEN` takes precedence when set
    pub api_token: Option<String>,
    pub min_length: usize,
    pub max_length: usize,
    pub timeout_secs: u64,
    pub parallel_fields: bool,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            model: "facebook/bart-large-cnn".to_string(),
            api_token: None,
            min_length: 30,
            max_length: 100,
            timeout_secs: 60,
            parallel_fields: true,
        }
    }
}

impl SummarizerConfig {
    /// Full URL the prompts are posted to.
    pub fn model_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.model.trim_start_matches('/')
        )
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    min_length: usize,
    max_length: usize,
    do_sample: bool,
}

/// Summarizer backed by an HTTP inference endpoint.
#[derive(Debug)]
pub struct HttpSummarizer {
    client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

impl HttpSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self, SummarizeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("papergraph/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SummarizeError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            url: config.model_url(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(
        &self,
        prompt: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, SummarizeError> {
        let body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                min_length,
                max_length,
                do_sample: false,
            },
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SummarizeError::Timeout
            } else {
                SummarizeError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SummarizeError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        debug!(bytes = text.len(), "summarizer response received");
        parse_inference_response(&text)
    }
}

/// Pull the summary out of an inference response body.
///
/// Accepts `[{"summary_text": ...}]` (summarization pipelines),
/// `[{"generated_text": ...}]` (text2text pipelines) and reports
/// `{"error": ...}` bodies as request failures.
pub fn parse_inference_response(body: &str) -> Result<String, SummarizeError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SummarizeError::Parse(e.to_string()))?;

    if let Some(error) = value.get("error").and_then(|v| v.as_str()) {
        return Err(SummarizeError::Request(error.to_string()));
    }

    let first = match &value {
        serde_json::Value::Array(items) => items.first(),
        serde_json::Value::Object(_) => Some(&value),
        _ => None,
    }
    .ok_or_else(|| SummarizeError::Parse("no summary in response".to_string()))?;

    let text = first
        .get("summary_text")
        .or_else(|| first.get("generated_text"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| SummarizeError::Parse("missing summary_text".to_string()))?;

    if text.trim().is_empty() {
        return Err(SummarizeError::EmptyResponse);
    }
    Ok(text.trim().to_string())
}

struct SharedSummarizer {
    config: SummarizerConfig,
    summarizer: Arc<HttpSummarizer>,
}

static SHARED: OnceCell<SharedSummarizer> = OnceCell::const_new();

/// The process-wide summarizer, created from `config` on first call.
///
/// Later calls return the same instance and ignore their `config`; a
/// differing config is logged at debug level.
pub async fn shared(config: &SummarizerConfig) -> Result<Arc<HttpSummarizer>, SummarizeError> {
    let entry = SHARED
        .get_or_try_init(|| async {
            let summarizer = HttpSummarizer::new(config)?;
            info!(url = summarizer.url(), "summarizer initialized");
            Ok::<_, SummarizeError>(SharedSummarizer {
                config: config.clone(),
                summarizer: Arc::new(summarizer),
            })
        })
        .await?;

    if entry.config != *config {
        debug!(
            active = entry.summarizer.url(),
            requested = %config.model_url(),
            "summarizer already initialized; ignoring new config"
        );
    }
    Ok(Arc::clone(&entry.summarizer))
}

/// Config the shared summarizer was built from, once it exists.
pub fn shared_config() -> Option<&'static SummarizerConfig> {
    SHARED.get().map(|entry| &entry.config)
}

/// A prompt the mock received, with its length bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub min_length: usize,
    pub max_length: usize,
}

/// Mock summarizer for testing: returns preconfigured responses.
///
/// Responses are matched by prompt prefix in registration order; prompts
/// matching nothing get the fallback, or an `Unavailable` error without one.
#[derive(Default)]
pub struct MockSummarizer {
    responses: Vec<(String, Result<String, String>)>,
    fallback: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for prompts starting with `prefix`.
    pub fn with_response(mut self, prefix: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.push((prefix.into(), Ok(response.into())));
        self
    }

    /// Register a failure for prompts starting with `prefix`.
    pub fn with_failure(mut self, prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        self.responses.push((prefix.into(), Err(reason.into())));
        self
    }

    /// Response for prompts that match no registered prefix.
    pub fn with_fallback(mut self, response: impl Into<String>) -> Self {
        self.fallback = Some(response.into());
        self
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(
        &self,
        prompt: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, SummarizeError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                min_length,
                max_length,
            });
        }

        let matched = self
            .responses
            .iter()
            .find(|(prefix, _)| prompt.starts_with(prefix.as_str()))
            .map(|(_, response)| response);

        match (matched, &self.fallback) {
            (Some(Ok(text)), _) => Ok(text.clone()),
            (Some(Err(reason)), _) => Err(SummarizeError::Request(reason.clone())),
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Err(SummarizeError::Unavailable(
                "no mock response for prompt".to_string(),
            )),
        }
    }
}
