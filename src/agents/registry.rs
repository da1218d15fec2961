//! Name-keyed registry of extraction agents with per-domain defaults.

use std::collections::HashMap;
use std::sync::Arc;

use crate::agents::action_items::ActionItemAgent;
use crate::agents::agent::ExtractionAgent;
use crate::agents::decisions::DecisionAgent;
use crate::agents::delivery::DeliveryAgent;
use crate::agents::evaluation::EvaluationAgent;
use crate::agents::knowledge::KnowledgeAgent;
use crate::agents::qna::QnAAgent;
use crate::agents::risks::RiskAgent;
use crate::llm::LLMClient;
use crate::plan::TaskDomain;

/// Agent names as the planner spells them
pub mod agent_names {
    pub const ACTION_ITEMS: &str = "action_item_extraction";
    pub const RISKS: &str = "risk_extraction";
    pub const DECISIONS: &str = "decision_extraction";
    pub const KNOWLEDGE: &str = "knowledge_retrieval";
    pub const QNA: &str = "qna";
    pub const EVALUATION: &str = "evaluation";
    pub const DELIVERY: &str = "message_delivery";
}

/// All registered agents, keyed by their planner-facing names.
///
/// `new` wires up the full built-in set; `empty` plus `insert` exists for
/// tests and for embedding callers that bring their own agents.
#[derive(Clone)]
pub struct AgentRegistry {
    agents: HashMap<&'static str, Arc<dyn ExtractionAgent>>,
}

impl AgentRegistry {
    /// Build the full built-in agent set over one shared client
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        let mut registry = Self::empty();
        registry.insert(Arc::new(ActionItemAgent::new(client.clone())));
        registry.insert(Arc::new(RiskAgent::new(client.clone())));
        registry.insert(Arc::new(DecisionAgent::new(client.clone())));
        registry.insert(Arc::new(KnowledgeAgent::new(client.clone())));
        registry.insert(Arc::new(QnAAgent::new(client.clone())));
        registry.insert(Arc::new(EvaluationAgent::new(client.clone())));
        registry.insert(Arc::new(DeliveryAgent::new(client)));
        registry
    }

    pub fn empty() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Register an agent under its own name, replacing any previous entry
    pub fn insert(&mut self, agent: Arc<dyn ExtractionAgent>) {
        self.agents.insert(agent.name(), agent);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ExtractionAgent>> {
        self.agents.get(name).cloned()
    }

    /// The agent a domain falls back to when a task names no specific one
    pub fn domain_default(&self, domain: TaskDomain) -> Option<Arc<dyn ExtractionAgent>> {
        let name = match domain {
            TaskDomain::TrackingExecution => agent_names::ACTION_ITEMS,
            TaskDomain::CommunicationCollaboration => agent_names::QNA,
            TaskDomain::LearningImprovement => agent_names::DECISIONS,
        };
        self.get(name)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.agents.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
