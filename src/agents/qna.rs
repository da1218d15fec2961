//! Gap-aware response drafting.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::agents::agent::{AgentCore, ExtractionAgent};
use crate::agents::registry::agent_names;
use crate::agents::types::{ExtractionOutput, QnAResponse};
use crate::llm::LLMClient;
use crate::prompts::QNA_SYSTEM_PROMPT;

/// Drafts a response that separates what is known, what was logged, and
/// what is still missing.
pub struct QnAAgent {
    core: AgentCore,
}

impl QnAAgent {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            core: AgentCore::new(client, agent_names::QNA, QNA_SYSTEM_PROMPT),
        }
    }
}

#[async_trait]
impl ExtractionAgent for QnAAgent {
    fn name(&self) -> &'static str {
        agent_names::QNA
    }

    fn description(&self) -> &'static str {
        "Formulate gap-aware responses"
    }

    fn empty_output(&self) -> ExtractionOutput {
        ExtractionOutput::Qna(QnAResponse {
            response: "Unable to formulate response due to insufficient context.".to_string(),
            what_i_need: vec!["More context required".to_string()],
            ..Default::default()
        })
    }

    async fn extract(&self, content: &str, task_id: Option<&str>) -> Result<ExtractionOutput> {
        match self
            .core
            .extract_model::<QnAResponse>(content, task_id)
            .await
        {
            Some(result) => Ok(ExtractionOutput::Qna(result)),
            None => Ok(self.empty_output()),
        }
    }
}
