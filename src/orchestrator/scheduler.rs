//! Dependency-ordered execution of a task plan.
//!
//! Tasks run sequentially in the order [`TaskPlan::execution_order`]
//! produces. Before each task runs, the outputs of its completed
//! dependencies are summarized and appended to the message content under a
//! delimiter, so downstream agents see what upstream ones found without
//! being handed full payloads.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::agents::ExtractionOutput;
use crate::orchestrator::router::Router;
use crate::plan::{PlannedTask, TaskDomain, TaskPlan, TaskStatus};

/// Separates original message content from forwarded dependency results
pub const PREVIOUS_RESULTS_DELIMITER: &str = "--- Previous Results ---";

/// The outcome of routing and executing one planned task
#[derive(Serialize, Clone, Debug)]
pub struct RoutingResult {
    /// The task as it looked after execution, final status included
    pub task: PlannedTask,
    pub domain: TaskDomain,
    /// Agent name as requested by the plan, or the resolved default
    pub agent: Option<String>,
    pub output: Option<ExtractionOutput>,
    pub success: bool,
    pub error: Option<String>,
    pub status: TaskStatus,
}

/// Runs every task in a plan against its resolved agent, threading
/// dependency context between them.
pub struct DependencyScheduler {
    router: Router,
}

impl DependencyScheduler {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Execute the whole plan. Statuses are written back into `plan` as
    /// tasks move through routing and execution; one result per task comes
    /// back in execution order. A failed task never stops the plan.
    pub async fn execute(&self, plan: &mut TaskPlan, content: &str) -> Vec<RoutingResult> {
        if plan.has_circular_dependency() {
            warn!("task plan contains a dependency cycle; proceeding with forced ordering");
        }
        let order = plan.execution_order();
        let mut completed: HashMap<String, RoutingResult> = HashMap::new();
        let mut results = Vec::with_capacity(order.len());

        for idx in order {
            let task_id = plan.tasks[idx].task_id.clone();
            let domain = plan.tasks[idx].domain;
            let explicit_agent = plan.tasks[idx].l3_agent.clone();

            plan.tasks[idx].status = TaskStatus::Routing;
            let context = Self::dependency_context(&plan.tasks[idx], &completed);
            let augmented = Self::augment_content(content, context);

            let (agent_name, output, success, error) =
                match self.router.resolve(&plan.tasks[idx]) {
                    None => {
                        warn!("no agent available for task {} in {}", task_id, domain);
                        plan.tasks[idx].status = TaskStatus::Failed;
                        (
                            explicit_agent.clone(),
                            None,
                            false,
                            Some(format!("No agent found for task: {}", task_id)),
                        )
                    }
                    Some(agent) => {
                        info!(
                            "routing task {} to {}/{}",
                            task_id,
                            domain,
                            explicit_agent.as_deref().unwrap_or("default")
                        );
                        plan.tasks[idx].status = TaskStatus::Executing;
                        match agent.extract(&augmented, Some(&task_id)).await {
                            Ok(output) => {
                                plan.tasks[idx].status = TaskStatus::Completed;
                                (
                                    Some(
                                        explicit_agent
                                            .clone()
                                            .unwrap_or_else(|| agent.name().to_string()),
                                    ),
                                    Some(output),
                                    true,
                                    None,
                                )
                            }
                            Err(err) => {
                                error!("extraction agent error for task {}: {}", task_id, err);
                                plan.tasks[idx].status = TaskStatus::Failed;
                                (
                                    Some(agent.name().to_string()),
                                    None,
                                    false,
                                    Some(err.to_string()),
                                )
                            }
                        }
                    }
                };

            let result = RoutingResult {
                task: plan.tasks[idx].clone(),
                domain,
                agent: agent_name,
                output,
                success,
                error,
                status: plan.tasks[idx].status,
            };
            completed.insert(task_id, result.clone());
            results.push(result);
        }

        let successful = results.iter().filter(|r| r.success).count();
        info!("{}/{} tasks completed successfully", successful, results.len());
        results
    }

    /// Summarize the outputs of a task's completed dependencies.
    ///
    /// A drafted response is forwarded in full under a "Response to
    /// evaluate:" heading; list outputs shrink to an item count; outputs
    /// with neither shape are forwarded as compact JSON. Failed or
    /// empty-handed dependencies contribute nothing.
    fn dependency_context(
        task: &PlannedTask,
        completed: &HashMap<String, RoutingResult>,
    ) -> Option<String> {
        let mut fragments = Vec::new();
        for dep_id in &task.depends_on {
            let Some(result) = completed.get(dep_id) else {
                continue;
            };
            if !result.success {
                continue;
            }
            let Some(output) = &result.output else {
                continue;
            };
            if let Some(response) = output.primary_response() {
                fragments.push(format!("Response to evaluate:\n{}", response));
            } else if let Some(count) = output.item_count() {
                if count > 0 {
                    fragments.push(format!("Extracted from {}: {} items", dep_id, count));
                }
            } else {
                fragments.push(format!(
                    "{}: {}",
                    dep_id,
                    serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
                ));
            }
        }
        if fragments.is_empty() {
            None
        } else {
            Some(fragments.join("\n"))
        }
    }

    fn augment_content(content: &str, context: Option<String>) -> String {
        match context {
            Some(ctx) => format!("{content}\n\n{PREVIOUS_RESULTS_DELIMITER}\n{ctx}"),
            None => content.to_string(),
        }
    }
}
