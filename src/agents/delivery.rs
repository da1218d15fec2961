//! Delivery metadata preparation. No transport is wired up; receipts are
//! marked sent to exercise the downstream flow.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::agents::agent::{AgentCore, ExtractionAgent};
use crate::agents::registry::agent_names;
use crate::agents::types::{DeliveryReceipt, DeliveryStatus, ExtractionOutput};
use crate::llm::LLMClient;
use crate::prompts::DELIVERY_SYSTEM_PROMPT;

pub struct DeliveryAgent {
    core: AgentCore,
}

impl DeliveryAgent {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            core: AgentCore::new(client, agent_names::DELIVERY, DELIVERY_SYSTEM_PROMPT),
        }
    }

    /// Like [`extract`](ExtractionAgent::extract), but overrides channel and
    /// recipient with known values from the original message
    pub async fn extract_with_context(
        &self,
        content: &str,
        task_id: Option<&str>,
        channel: Option<&str>,
        recipient: Option<&str>,
    ) -> Result<ExtractionOutput> {
        let output = self.extract(content, task_id).await?;
        let ExtractionOutput::Delivery(mut receipt) = output else {
            return Ok(output);
        };
        if let Some(channel) = channel {
            receipt.channel = channel.to_string();
        }
        if let Some(recipient) = recipient {
            receipt.recipient = recipient.to_string();
        }
        receipt.delivery_status = DeliveryStatus::Sent;
        Ok(ExtractionOutput::Delivery(receipt))
    }
}

#[async_trait]
impl ExtractionAgent for DeliveryAgent {
    fn name(&self) -> &'static str {
        agent_names::DELIVERY
    }

    fn description(&self) -> &'static str {
        "Send responses to recipients"
    }

    fn empty_output(&self) -> ExtractionOutput {
        ExtractionOutput::Delivery(DeliveryReceipt::default())
    }

    async fn extract(&self, content: &str, task_id: Option<&str>) -> Result<ExtractionOutput> {
        match self
            .core
            .extract_model::<DeliveryReceipt>(content, task_id)
            .await
        {
            Some(receipt) => Ok(ExtractionOutput::Delivery(receipt)),
            None => Ok(self.empty_output()),
        }
    }
}
