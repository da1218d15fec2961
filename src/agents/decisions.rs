//! Decision extraction.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::agents::agent::{AgentCore, ExtractionAgent};
use crate::agents::registry::agent_names;
use crate::agents::types::{DecisionsResult, ExtractionOutput};
use crate::llm::LLMClient;
use crate::prompts::DECISIONS_SYSTEM_PROMPT;

/// Extracts decisions that were made or still need to be made.
pub struct DecisionAgent {
    core: AgentCore,
}

impl DecisionAgent {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            core: AgentCore::new(client, agent_names::DECISIONS, DECISIONS_SYSTEM_PROMPT),
        }
    }
}

#[async_trait]
impl ExtractionAgent for DecisionAgent {
    fn name(&self) -> &'static str {
        agent_names::DECISIONS
    }

    fn description(&self) -> &'static str {
        "Extract decisions needed or made"
    }

    fn empty_output(&self) -> ExtractionOutput {
        ExtractionOutput::Decisions(DecisionsResult::default())
    }

    async fn extract(&self, content: &str, task_id: Option<&str>) -> Result<ExtractionOutput> {
        match self
            .core
            .extract_model::<DecisionsResult>(content, task_id)
            .await
        {
            Some(result) => Ok(ExtractionOutput::Decisions(result)),
            None => Ok(self.empty_output()),
        }
    }
}
