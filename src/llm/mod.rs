//! LLM transport layer: the client trait, the Groq-compatible HTTP client,
//! the retry policy for transient failures, and JSON recovery for model
//! output that arrives wrapped in prose or code fences.

pub mod client;
pub mod json;
pub mod retry;
pub mod types;

pub use client::{GroqClient, LLMClient, StaticClient};
pub use json::{JsonExtractError, extract_json};
pub use retry::RetryPolicy;
pub use types::*;
