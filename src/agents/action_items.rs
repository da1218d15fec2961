//! Action item extraction.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::agents::agent::{AgentCore, ExtractionAgent};
use crate::agents::registry::agent_names;
use crate::agents::types::{ActionItemsResult, ExtractionOutput};
use crate::llm::LLMClient;
use crate::prompts::ACTION_ITEMS_SYSTEM_PROMPT;

/// Extracts tasks, to-dos, and assignments, flagging missing owners
/// and due dates.
pub struct ActionItemAgent {
    core: AgentCore,
}

impl ActionItemAgent {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            core: AgentCore::new(client, agent_names::ACTION_ITEMS, ACTION_ITEMS_SYSTEM_PROMPT),
        }
    }
}

#[async_trait]
impl ExtractionAgent for ActionItemAgent {
    fn name(&self) -> &'static str {
        agent_names::ACTION_ITEMS
    }

    fn description(&self) -> &'static str {
        "Extract tasks, to-dos, assignments"
    }

    fn empty_output(&self) -> ExtractionOutput {
        ExtractionOutput::ActionItems(ActionItemsResult::default())
    }

    async fn extract(&self, content: &str, task_id: Option<&str>) -> Result<ExtractionOutput> {
        match self
            .core
            .extract_model::<ActionItemsResult>(content, task_id)
            .await
        {
            Some(mut result) => {
                result.annotate_gaps();
                Ok(ExtractionOutput::ActionItems(result))
            }
            None => Ok(self.empty_output()),
        }
    }
}
