//! The extraction agent trait and shared prompting plumbing.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::agents::types::ExtractionOutput;
use crate::llm::{CompletionRequest, LLMClient, extract_json};
use crate::prompts::extraction_user_prompt;

/// Slightly creative but still schema-stable
pub const EXTRACTION_TEMPERATURE: f32 = 0.3;

/// A single-purpose L3 worker.
///
/// Implementations never abort the pipeline for model trouble: an LLM or
/// parse failure degrades to [`empty_output`](ExtractionAgent::empty_output).
/// `Err` is reserved for failures outside the extraction itself.
#[async_trait]
pub trait ExtractionAgent: Send + Sync {
    /// Stable registry name, as the planner spells it
    fn name(&self) -> &'static str;

    /// One-line capability summary
    fn description(&self) -> &'static str;

    /// The output this agent produces when it has nothing to work with
    fn empty_output(&self) -> ExtractionOutput;

    /// Run the extraction over `content`, stamping `task_id` into the result
    async fn extract(&self, content: &str, task_id: Option<&str>) -> Result<ExtractionOutput>;
}

/// Shared prompting, JSON recovery, and deserialization for the
/// concrete agents.
pub(crate) struct AgentCore {
    client: Arc<dyn LLMClient>,
    name: &'static str,
    system_prompt: &'static str,
}

impl AgentCore {
    pub(crate) fn new(
        client: Arc<dyn LLMClient>,
        name: &'static str,
        system_prompt: &'static str,
    ) -> Self {
        Self {
            client,
            name,
            system_prompt,
        }
    }

    /// Prompt the model and deserialize its JSON into `T`, stamping the
    /// originating task id into the payload first. Returns `None` for empty
    /// content and for every model-side failure.
    pub(crate) async fn extract_model<T: DeserializeOwned>(
        &self,
        content: &str,
        task_id: Option<&str>,
    ) -> Option<T> {
        if content.trim().is_empty() {
            debug!("{}: empty content, returning empty result", self.name);
            return None;
        }
        info!(
            "{}: extracting from content ({} chars)",
            self.name,
            content.len()
        );

        let request = CompletionRequest::new(self.system_prompt, extraction_user_prompt(content))
            .with_temperature(EXTRACTION_TEMPERATURE);
        let raw = match self.client.complete(request).await {
            Ok(raw) => raw,
            Err(err) => {
                error!("{} extraction error: {}", self.name, err);
                return None;
            }
        };

        let mut value = match extract_json(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: failed to parse response: {}", self.name, err);
                return None;
            }
        };
        if let Some(task_id) = task_id
            && let Some(map) = value.as_object_mut()
        {
            map.entry("source_task_id").or_insert(json!(task_id));
        }

        match serde_json::from_value::<T>(value) {
            Ok(model) => Some(model),
            Err(err) => {
                warn!("{}: response did not match schema: {}", self.name, err);
                None
            }
        }
    }
}
