//! L1 planning: turn a message into a dependency-ordered task plan.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::llm::{CompletionRequest, LLMClient, extract_json};
use crate::message::Message;
use crate::plan::{PlannedTask, TaskPlan, TaskPriority};
use crate::prompts::{planner_system_prompt, planner_user_prompt, timeline_context_section};
use crate::timeline::TimelineEngine;

const PLANNING_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TASKS: usize = 10;

/// What came out of a planning attempt.
///
/// `success` is about the attempt, not the plan size: a message with
/// nothing actionable in it planning zero tasks is still a success.
#[derive(Clone, Debug)]
pub struct PlanningResult {
    pub success: bool,
    pub plan: TaskPlan,
    /// Unparsed model output, kept for diagnostics
    pub raw_response: Option<String>,
    pub error: Option<String>,
}

/// The L1 planner. Runs timeline analysis first and feeds it into the
/// planning prompt, then parses the model's plan leniently: malformed
/// tasks are dropped one by one instead of voiding the whole plan.
pub struct Planner {
    client: Arc<dyn LLMClient>,
    timeline: TimelineEngine,
    context: Value,
    max_tasks: usize,
    default_priority: TaskPriority,
}

impl Planner {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            timeline: TimelineEngine::new(client.clone()),
            client,
            context: json!({}),
            max_tasks: DEFAULT_MAX_TASKS,
            default_priority: TaskPriority::default(),
        }
    }

    /// Static context injected into the planning prompt (org names,
    /// project conventions, escalation contacts)
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    /// Cap on tasks accepted from a single plan; excess tasks are dropped
    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = max_tasks;
        self
    }

    /// Priority assigned to planned tasks that don't state one
    pub fn with_default_priority(mut self, priority: TaskPriority) -> Self {
        self.default_priority = priority;
        self
    }

    pub async fn plan(&self, message: &Message) -> PlanningResult {
        info!("planning tasks for message {}", message.message_id);

        let timeline = self.timeline.analyze(&message.content).await;
        let timeline_context = serde_json::to_string_pretty(&timeline)
            .unwrap_or_else(|_| "Timeline analysis failed.".to_string());

        let system = planner_system_prompt(&self.context);
        let mut user = planner_user_prompt(message);
        user.push_str(&timeline_context_section(&timeline_context));
        let request = CompletionRequest::new(system, user).with_temperature(PLANNING_TEMPERATURE);

        match self.client.complete(request).await {
            Ok(raw) => {
                let plan = self.parse_response(message, &raw);
                info!(
                    "planned {} tasks for message {}",
                    plan.len(),
                    message.message_id
                );
                PlanningResult {
                    success: true,
                    plan,
                    raw_response: Some(raw),
                    error: None,
                }
            }
            Err(err) => {
                error!("planning failed for message {}: {}", message.message_id, err);
                PlanningResult {
                    success: false,
                    plan: TaskPlan::empty_for(message),
                    raw_response: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn parse_response(&self, message: &Message, raw: &str) -> TaskPlan {
        let value = match extract_json(raw) {
            Ok(value) => value,
            Err(err) => {
                warn!("failed to extract JSON: {}, returning empty plan", err);
                return TaskPlan::empty_for(message);
            }
        };
        let Some(candidates) = value.get("tasks").and_then(|v| v.as_array()) else {
            warn!("plan response had no tasks array, returning empty plan");
            return TaskPlan::empty_for(message);
        };

        let mut tasks = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match serde_json::from_value::<PlannedTask>(candidate.clone()) {
                Ok(mut task) => {
                    if candidate.get("priority").is_none() {
                        task.priority = self.default_priority;
                    }
                    tasks.push(task);
                }
                Err(err) => {
                    warn!("invalid task data: {}, error: {}", candidate, err);
                }
            }
        }
        if tasks.len() > self.max_tasks {
            warn!(
                "plan has {} tasks, truncating to {}",
                tasks.len(),
                self.max_tasks
            );
            tasks.truncate(self.max_tasks);
        }
        TaskPlan::new(message, tasks)
    }
}
