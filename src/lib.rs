//! # Message Orchestration Agent
//!
//! An LLM-driven pipeline that turns inbound work messages into executed
//! extraction tasks. A planner decomposes each message into a dependency-
//! ordered task plan, a scheduler routes every task to a narrow extraction
//! agent, and the results come back as typed records plus a rendered
//! plain-text orchestration map.
//!
//! ## Architecture Overview
//!
//! The system consists of several key components organized into modules:
//!
//! - **[`timeline`]**: deadline and urgency extraction with local conflict rules
//! - **[`orchestrator`]**: L1 planning plus L2 routing and dependency-ordered execution
//! - **[`agents`]**: the L3 extraction agents and their registry
//! - **[`llm`]**: OpenAI-compatible chat client with retry and JSON recovery
//! - **[`storage`]**: JSON-file persistence for plans, extractions, and maps
//! - **[`integration`]**: the facade wiring everything together
//!
//! ## Features
//!
//! ### 🎯 Planning and Scheduling
//! - **Timeline-Aware Planning**: deadline analysis feeds the planning prompt
//! - **Dependency Resolution**: stable topological ordering with cycle tolerance
//! - **Lenient Parsing**: malformed plan entries are dropped, never fatal
//!
//! ### 🔍 Extraction Agents
//! - **Seven Built-In Agents**: action items, risks, decisions, knowledge,
//!   Q&A, evaluation, and delivery
//! - **Domain Fallbacks**: tasks without an explicit agent route by domain
//! - **Context Forwarding**: dependency outputs are summarized into
//!   downstream prompts
//!
//! ### 💾 Persistence and Reporting
//! - **Typed Records**: every extraction lands as a tagged JSON record
//! - **Orchestration Maps**: one plain-text map per processed message
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use message_orchestration_agent::{Message, OrchestratorConfig, OrchestratorSystem};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let system = OrchestratorSystem::new(OrchestratorConfig::default())?;
//!
//!     let message = Message::new("MSG-001", "Please send the launch checklist by Friday.")
//!         .with_project("PROJ-APOLLO");
//!     let outcome = system.process_message(message).await;
//!
//!     println!("{}", outcome.orchestration_map);
//!     Ok(())
//! }
//! ```

/// Inbound message envelope and sender metadata.
pub mod message;

/// Task plans: domains, priorities, statuses, and execution ordering.
pub mod plan;

/// Timeline analysis: event extraction plus local conflict detection.
pub mod timeline;

/// OpenAI-compatible LLM client with retry, timeout handling, and
/// JSON recovery for model output.
pub mod llm;

/// Prompt texts and builders for the planner and the extraction agents.
pub mod prompts;

/// L3 extraction agents and their registry.
pub mod agents;

/// L1 planning plus L2 routing and dependency-ordered execution.
pub mod orchestrator;

/// Plain-text orchestration map rendering.
pub mod render;

/// JSON-file persistence for plans, extraction records, and maps.
pub mod storage;

/// High-level system integration.
///
/// Combines planner, scheduler, registry, and store into a single facade
/// with unified configuration.
pub mod integration;

/// Environment constants and path utilities.
///
/// Centralizes all hardcoded paths and directory names used throughout
/// the application for easier maintenance and consistency.
pub mod env;

// CLI module for command-line interface
pub mod cli;

// Re-export message types
pub use message::{Message, Sender};

// Re-export plan types
pub use plan::{PlannedTask, TaskDomain, TaskPlan, TaskPriority, TaskStatus};

// Re-export timeline types
pub use timeline::{TimelineAnalysis, TimelineConflict, TimelineEngine, TimelineEvent};

// Re-export LLM abstraction types
pub use llm::{GroqClient, LLMClient, LLMClientConfig, LLMError, StaticClient};

// Re-export agent types
pub use agents::{AgentRegistry, ExtractionAgent, ExtractionOutput};

// Re-export orchestration types
pub use orchestrator::{DependencyScheduler, Planner, PlanningResult, Router, RoutingResult};

// Re-export rendering and storage entry points
pub use render::render_orchestration_map;
pub use storage::OrchestrationStore;

// Re-export integration types
pub use integration::{OrchestrationOutcome, OrchestratorConfig, OrchestratorSystem};
