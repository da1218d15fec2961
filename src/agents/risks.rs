//! Risk extraction.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::agents::agent::{AgentCore, ExtractionAgent};
use crate::agents::registry::agent_names;
use crate::agents::types::{ExtractionOutput, RisksResult};
use crate::llm::LLMClient;
use crate::prompts::RISKS_SYSTEM_PROMPT;

/// Extracts risks, blockers, and concerns with likelihood and impact ratings.
pub struct RiskAgent {
    core: AgentCore,
}

impl RiskAgent {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            core: AgentCore::new(client, agent_names::RISKS, RISKS_SYSTEM_PROMPT),
        }
    }
}

#[async_trait]
impl ExtractionAgent for RiskAgent {
    fn name(&self) -> &'static str {
        agent_names::RISKS
    }

    fn description(&self) -> &'static str {
        "Extract risks, blockers, concerns"
    }

    fn empty_output(&self) -> ExtractionOutput {
        ExtractionOutput::Risks(RisksResult::default())
    }

    async fn extract(&self, content: &str, task_id: Option<&str>) -> Result<ExtractionOutput> {
        match self
            .core
            .extract_model::<RisksResult>(content, task_id)
            .await
        {
            Some(result) => Ok(ExtractionOutput::Risks(result)),
            None => Ok(self.empty_output()),
        }
    }
}
