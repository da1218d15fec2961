use crate::llm::json::preview;
use crate::llm::retry::RetryPolicy;
use crate::llm::types::{API_KEY_ENV_VAR, CompletionRequest, LLMClientConfig, LLMError};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Object-safe LLM client abstraction
///
/// One long-lived instance is built at startup and shared as an
/// `Arc<dyn LLMClient>` by every component that talks to the model: the
/// planner, the timeline engine, and all extraction agents.
pub trait LLMClient: Send + Sync {
    /// Client name for logs
    fn name(&self) -> &'static str;

    /// Execute a single chat completion and return the raw response text
    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, Result<String, LLMError>>;
}

/// Client for Groq's OpenAI-compatible chat-completions API
pub struct GroqClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
    retry: RetryPolicy,
}

impl GroqClient {
    /// Build a client from connection settings
    ///
    /// Fails on an invalid base URL or an unbuildable HTTP client; a missing
    /// API key only warns, since every later call will fail with a clear
    /// API error anyway.
    pub fn new(config: &LLMClientConfig) -> Result<Self> {
        Url::parse(&config.base_url)
            .with_context(|| format!("invalid LLM base URL: {}", config.base_url))?;

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .unwrap_or_default();
        if api_key.is_empty() {
            warn!("{} not set; LLM calls will fail", API_KEY_ENV_VAR);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint_for(&config.base_url),
            model: config.model.clone(),
            api_key,
            timeout_secs: config.timeout_secs,
            retry: RetryPolicy::with_max_attempts(config.max_retries),
        })
    }

    async fn send_completion(&self, request: &CompletionRequest) -> Result<String, LLMError> {
        debug!("calling chat completions with model: {}", self.model);

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.user_prompt},
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(
                "LLM API error ({}): {}",
                status.as_u16(),
                preview(&message, 200)
            );
            return Err(LLMError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| LLMError::MalformedResponse(err.to_string()))?;

        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                LLMError::MalformedResponse("missing choices[0].message.content".to_string())
            })?;

        debug!("completion response: {}...", preview(content, 200));
        Ok(content.to_string())
    }

    fn transport_error(&self, err: reqwest::Error) -> LLMError {
        if err.is_timeout() {
            LLMError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            LLMError::MalformedResponse(err.to_string())
        } else {
            LLMError::Connect(err.to_string())
        }
    }
}

impl LLMClient for GroqClient {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, Result<String, LLMError>> {
        Box::pin(async move {
            self.retry
                .run(|_attempt| self.send_completion(&request))
                .await
        })
    }
}

fn endpoint_for(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Canned-response client for tests and offline runs
pub struct StaticClient {
    response: String,
}

impl StaticClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl LLMClient for StaticClient {
    fn name(&self) -> &'static str {
        "static"
    }

    fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, Result<String, LLMError>> {
        let response = self.response.clone();
        Box::pin(async move { Ok(response) })
    }
}
