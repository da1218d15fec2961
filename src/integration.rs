//! # High-Level System Integration
//!
//! Wires the planner, scheduler, agent registry, and store into one
//! facade with a unified configuration surface.
//!
//! ## Core Components
//!
//! - **[`OrchestratorSystem`]**: the message-in, map-out pipeline facade
//! - **[`OrchestratorConfig`]**: TOML-backed configuration for every layer
//! - **[`OrchestrationOutcome`]**: what a caller gets back per message
//!
//! ## Pipeline
//!
//! ```text
//! Message ─▶ Timeline ─▶ L1 Planner ─▶ L2 Scheduler ─▶ L3 Agents
//!                                         │
//!                                         ▼
//!                                  Store + Rendered Map
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use message_orchestration_agent::{Message, OrchestratorConfig, OrchestratorSystem};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let system = OrchestratorSystem::new(OrchestratorConfig::default())?;
//!
//!     let message = Message::new("MSG-001", "Please send the launch checklist by Friday.");
//!     let outcome = system.process_message(message).await;
//!
//!     println!("{}", outcome.orchestration_map);
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::agents::AgentRegistry;
use crate::env;
use crate::llm::{GroqClient, LLMClient, LLMClientConfig};
use crate::message::Message;
use crate::orchestrator::{DependencyScheduler, Planner, PlanningResult, Router};
use crate::plan::TaskPriority;
use crate::render::render_orchestration_map;
use crate::storage::OrchestrationStore;

/// Where extraction records and maps land on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
}

fn default_store_root() -> PathBuf {
    PathBuf::from(env::store::DEFAULT_ROOT)
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: default_store_root(),
        }
    }
}

/// Planner and scheduler knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    /// Cap on tasks accepted from one plan
    #[serde(default = "default_max_tasks")]
    pub max_tasks_per_message: usize,
    /// Priority for planned tasks that don't state one
    #[serde(default)]
    pub default_priority: TaskPriority,
    /// Free-form context injected into the planning prompt
    #[serde(default)]
    pub context: Option<toml::Table>,
}

fn default_max_tasks() -> usize {
    10
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            max_tasks_per_message: default_max_tasks(),
            default_priority: TaskPriority::default(),
            context: None,
        }
    }
}

/// Unified configuration for the whole pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub llm: LLMClientConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub orchestrator: OrchestratorSettings,
}

impl OrchestratorConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse TOML configuration")
    }

    /// Write this configuration to a TOML file
    pub fn to_toml_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = self.to_toml_string()?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Serialize this configuration to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// Per-message result handed back to callers.
///
/// `success` reflects the pipeline, not individual tasks: a message whose
/// plan had failing tasks still succeeds, and the failures show up in the
/// rendered map.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationOutcome {
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
    pub orchestration_map: String,
    pub task_count: usize,
    pub success: bool,
    pub error: Option<String>,
}

/// The assembled pipeline: planner, scheduler, registry, and store behind
/// one entry point.
pub struct OrchestratorSystem {
    config: OrchestratorConfig,
    planner: Planner,
    scheduler: DependencyScheduler,
    store: OrchestrationStore,
}

impl OrchestratorSystem {
    /// Build the system with the default HTTP-backed LLM client
    pub fn new(config: OrchestratorConfig) -> Result<Self> {
        let client: Arc<dyn LLMClient> = Arc::new(GroqClient::new(&config.llm)?);
        Self::with_client(config, client)
    }

    /// Build the system over a caller-supplied client. This is the seam
    /// embedding callers and tests use to swap the model out.
    pub fn with_client(config: OrchestratorConfig, client: Arc<dyn LLMClient>) -> Result<Self> {
        let registry = AgentRegistry::new(client.clone());
        let scheduler = DependencyScheduler::new(Router::new(registry));
        let mut planner = Planner::new(client)
            .with_max_tasks(config.orchestrator.max_tasks_per_message)
            .with_default_priority(config.orchestrator.default_priority);
        if let Some(context) = &config.orchestrator.context
            && let Ok(value) = serde_json::to_value(context)
        {
            planner = planner.with_context(value);
        }
        let store = OrchestrationStore::new(&config.storage.root)?;
        Ok(Self {
            config,
            planner,
            scheduler,
            store,
        })
    }

    /// Run the full pipeline for one message: plan, execute, persist,
    /// render. Never panics and never returns `Err`; failures come back
    /// inside the outcome.
    pub async fn process_message(&self, mut message: Message) -> OrchestrationOutcome {
        if message.message_id.trim().is_empty() {
            message.message_id = format!("MSG-{}", Utc::now().timestamp());
        }
        info!("processing message {}", message.message_id);

        match self.run_pipeline(&message).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("pipeline failed for message {}: {:#}", message.message_id, err);
                OrchestrationOutcome {
                    message_id: message.message_id.clone(),
                    timestamp: Utc::now(),
                    orchestration_map: String::new(),
                    task_count: 0,
                    success: false,
                    error: Some(format!("{err:#}")),
                }
            }
        }
    }

    async fn run_pipeline(&self, message: &Message) -> Result<OrchestrationOutcome> {
        let planning = self.planner.plan(message).await;
        if !planning.success {
            bail!(
                "planning failed: {}",
                planning
                    .error
                    .unwrap_or_else(|| "unknown error".to_string())
            );
        }
        let mut plan = planning.plan;
        self.store.save_task_plan(&plan).await?;

        let results = self.scheduler.execute(&mut plan, &message.content).await;
        for result in &results {
            if let Some(output) = result.output.as_ref().filter(|_| result.success) {
                let extraction_type = result
                    .agent
                    .clone()
                    .unwrap_or_else(|| result.domain.to_string());
                if let Err(err) = self
                    .store
                    .save_extraction(&result.task.task_id, &extraction_type, output)
                    .await
                {
                    warn!(
                        "failed to persist extraction for {}: {:#}",
                        result.task.task_id, err
                    );
                }
            }
        }

        let map = render_orchestration_map(&plan, &results);
        self.store
            .save_orchestration_map(&message.message_id, &map)
            .await?;

        Ok(OrchestrationOutcome {
            message_id: message.message_id.clone(),
            timestamp: Utc::now(),
            orchestration_map: map,
            task_count: plan.len(),
            success: true,
            error: None,
        })
    }

    /// Plan without executing, for inspection
    pub async fn plan_only(&self, message: &Message) -> PlanningResult {
        self.planner.plan(message).await
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn store(&self) -> &OrchestrationStore {
        &self.store
    }
}
