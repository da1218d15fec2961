//! Project knowledge retrieval. Currently backed by the model's plausible
//! mock data rather than a live project database.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::agents::agent::{AgentCore, ExtractionAgent};
use crate::agents::registry::agent_names;
use crate::agents::types::{ExtractionOutput, KnowledgeResult};
use crate::llm::LLMClient;
use crate::prompts::KNOWLEDGE_SYSTEM_PROMPT;

pub struct KnowledgeAgent {
    core: AgentCore,
}

impl KnowledgeAgent {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            core: AgentCore::new(client, agent_names::KNOWLEDGE, KNOWLEDGE_SYSTEM_PROMPT),
        }
    }

    /// Like [`extract`](ExtractionAgent::extract), but pins the result to a
    /// known project id when the model leaves it blank
    pub async fn extract_for_project(
        &self,
        content: &str,
        task_id: Option<&str>,
        project: Option<&str>,
    ) -> Result<ExtractionOutput> {
        let output = self.extract(content, task_id).await?;
        let ExtractionOutput::Knowledge(mut result) = output else {
            return Ok(output);
        };
        if result.project.as_deref().is_none_or(str::is_empty) {
            result.project = project.map(String::from);
        }
        Ok(ExtractionOutput::Knowledge(result))
    }
}

#[async_trait]
impl ExtractionAgent for KnowledgeAgent {
    fn name(&self) -> &'static str {
        agent_names::KNOWLEDGE
    }

    fn description(&self) -> &'static str {
        "Retrieve project context (cross-cutting)"
    }

    fn empty_output(&self) -> ExtractionOutput {
        ExtractionOutput::Knowledge(KnowledgeResult::default())
    }

    async fn extract(&self, content: &str, task_id: Option<&str>) -> Result<ExtractionOutput> {
        match self
            .core
            .extract_model::<KnowledgeResult>(content, task_id)
            .await
        {
            Some(result) => Ok(ExtractionOutput::Knowledge(result)),
            None => Ok(self.empty_output()),
        }
    }
}
