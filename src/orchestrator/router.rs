//! Task-to-agent resolution.

use std::sync::Arc;

use tracing::debug;

use crate::agents::{AgentRegistry, ExtractionAgent};
use crate::plan::PlannedTask;

/// Resolves a planned task to the agent that should run it.
///
/// An explicitly named `l3_agent` wins; otherwise the task's domain picks
/// its default. Unknown explicit names fall through to the domain default
/// too, so planner drift degrades instead of failing the task.
#[derive(Clone)]
pub struct Router {
    registry: AgentRegistry,
}

impl Router {
    pub fn new(registry: AgentRegistry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, task: &PlannedTask) -> Option<Arc<dyn ExtractionAgent>> {
        if let Some(name) = task.l3_agent.as_deref() {
            if let Some(agent) = self.registry.get(name) {
                return Some(agent);
            }
            debug!(
                "task {} names unknown agent '{}', falling back to domain default",
                task.task_id, name
            );
        }
        self.registry.domain_default(task.domain)
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }
}
