use serde::{Deserialize, Serialize};

/// Environment variable consulted when the config carries no API key
pub const API_KEY_ENV_VAR: &str = "GROQ_API_KEY";

/// Default OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default completion model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// A single chat-completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request with default sampling parameters
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Connection settings for the HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMClientConfig {
    /// API key; falls back to the `GROQ_API_KEY` environment variable when unset
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Total attempts for transient failures, including the first
    pub max_retries: u32,
}

impl Default for LLMClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            max_retries: 3,
        }
    }
}

/// Errors surfaced by LLM clients
///
/// Only timeout and connect failures are retryable; API errors (the service
/// answered with a non-success status) and malformed payloads are not.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LLMError {
    #[error("LLM request timed out after {0}s")]
    Timeout(u64),
    #[error("could not reach LLM endpoint: {0}")]
    Connect(String),
    #[error("LLM API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),
}

impl LLMError {
    /// Check whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, LLMError::Timeout(_) | LLMError::Connect(_))
    }
}
