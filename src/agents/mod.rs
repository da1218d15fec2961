//! L3 extraction agents: narrow, single-purpose workers that turn message
//! content into typed extraction records.
//!
//! Each agent owns a system prompt and a result type; the shared plumbing
//! for prompting, JSON recovery, and deserialization lives in [`agent`].
//! The [`registry`] maps planner agent names and domains to instances.

pub mod action_items;
pub mod agent;
pub mod decisions;
pub mod delivery;
pub mod evaluation;
pub mod knowledge;
pub mod qna;
pub mod registry;
pub mod risks;
pub mod types;

#[cfg(test)]
mod tests;

pub use action_items::ActionItemAgent;
pub use agent::ExtractionAgent;
pub use decisions::DecisionAgent;
pub use delivery::DeliveryAgent;
pub use evaluation::EvaluationAgent;
pub use knowledge::KnowledgeAgent;
pub use qna::QnAAgent;
pub use registry::{AgentRegistry, agent_names};
pub use risks::RiskAgent;
pub use types::*;
