use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::agents::{
    ActionItem, ActionItemsResult, AgentRegistry, ExtractionAgent, ExtractionOutput, ItemStatus,
    QnAResponse, agent_names,
};
use crate::llm::{CompletionRequest, LLMClient, LLMError, StaticClient};
use crate::message::Message;
use crate::orchestrator::{
    DependencyScheduler, PREVIOUS_RESULTS_DELIMITER, Planner, Router,
};
use crate::plan::{PlannedTask, TaskDomain, TaskPlan, TaskPriority, TaskStatus};

/// Agent that records every content string it receives and replies with a
/// fixed output.
struct StubAgent {
    name: &'static str,
    output: ExtractionOutput,
    seen: Arc<Mutex<Vec<String>>>,
}

impl StubAgent {
    fn new(name: &'static str, output: ExtractionOutput) -> (Self, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                name,
                output,
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl ExtractionAgent for StubAgent {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "records content, returns a fixed output"
    }

    fn empty_output(&self) -> ExtractionOutput {
        self.output.clone()
    }

    async fn extract(&self, content: &str, _task_id: Option<&str>) -> Result<ExtractionOutput> {
        self.seen.lock().unwrap().push(content.to_string());
        Ok(self.output.clone())
    }
}

struct FailingAgent {
    name: &'static str,
}

#[async_trait]
impl ExtractionAgent for FailingAgent {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "always fails"
    }

    fn empty_output(&self) -> ExtractionOutput {
        ExtractionOutput::ActionItems(ActionItemsResult::default())
    }

    async fn extract(&self, _content: &str, _task_id: Option<&str>) -> Result<ExtractionOutput> {
        anyhow::bail!("agent blew up")
    }
}

struct FailingClient;

impl LLMClient for FailingClient {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, Result<String, LLMError>> {
        Box::pin(async { Err(LLMError::Connect("connection refused".to_string())) })
    }
}

fn action_items_output(count: usize) -> ExtractionOutput {
    let items = (0..count)
        .map(|i| ActionItem {
            id: Some(format!("AI-{:03}", i + 1)),
            action: format!("action {}", i + 1),
            owner: Some("Dana".to_string()),
            deadline: Some("2026-09-01".to_string()),
            status: ItemStatus::Pending,
            flags: Vec::new(),
        })
        .collect();
    ExtractionOutput::ActionItems(ActionItemsResult {
        items,
        ..Default::default()
    })
}

fn qna_output(response: &str) -> ExtractionOutput {
    ExtractionOutput::Qna(QnAResponse {
        response: response.to_string(),
        ..Default::default()
    })
}

fn task(id: &str, agent: &'static str, deps: &[&str]) -> PlannedTask {
    PlannedTask::new(id, TaskDomain::TrackingExecution, format!("run {agent}"))
        .with_agent(agent)
        .with_dependencies(deps.iter().map(|s| s.to_string()).collect())
}

fn scheduler_with(agents: Vec<Arc<dyn ExtractionAgent>>) -> DependencyScheduler {
    let mut registry = AgentRegistry::empty();
    for agent in agents {
        registry.insert(agent);
    }
    DependencyScheduler::new(Router::new(registry))
}

// ============================================================================
// Scheduler
// ============================================================================

#[tokio::test]
async fn test_every_task_produces_one_result_in_order() {
    let (a, _) = StubAgent::new(agent_names::ACTION_ITEMS, action_items_output(1));
    let (b, _) = StubAgent::new(agent_names::RISKS, action_items_output(0));
    let scheduler = scheduler_with(vec![Arc::new(a), Arc::new(b)]);

    let mut plan = TaskPlan::from_tasks(vec![
        task("TASK-001", agent_names::ACTION_ITEMS, &[]),
        task("TASK-002", agent_names::RISKS, &[]),
        task("TASK-003", agent_names::ACTION_ITEMS, &[]),
    ]);
    let results = scheduler.execute(&mut plan, "the message").await;

    assert_eq!(results.len(), 3);
    let ids: Vec<&str> = results.iter().map(|r| r.task.task_id.as_str()).collect();
    assert_eq!(ids, vec!["TASK-001", "TASK-002", "TASK-003"]);
    assert!(results.iter().all(|r| r.success));
    assert!(results.iter().all(|r| r.status == TaskStatus::Completed));
    assert!(plan.tasks.iter().all(|t| t.status == TaskStatus::Completed));
}

#[tokio::test]
async fn test_failed_dependency_does_not_stop_the_plan() {
    let failing = FailingAgent {
        name: agent_names::ACTION_ITEMS,
    };
    let (stub, seen) = StubAgent::new(agent_names::RISKS, action_items_output(0));
    let scheduler = scheduler_with(vec![Arc::new(failing), Arc::new(stub)]);

    let mut plan = TaskPlan::from_tasks(vec![
        task("TASK-001", agent_names::ACTION_ITEMS, &[]),
        task("TASK-002", agent_names::RISKS, &["TASK-001"]),
    ]);
    let results = scheduler.execute(&mut plan, "the message").await;

    assert!(!results[0].success);
    assert_eq!(results[0].status, TaskStatus::Failed);
    assert_eq!(results[0].error.as_deref(), Some("agent blew up"));
    assert!(results[1].success);

    // The dependent still ran, and saw no forwarded results.
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], "the message");
    assert!(!seen[0].contains(PREVIOUS_RESULTS_DELIMITER));
}

#[tokio::test]
async fn test_dependency_item_counts_are_forwarded() {
    let (upstream, _) = StubAgent::new(agent_names::ACTION_ITEMS, action_items_output(2));
    let (downstream, seen) = StubAgent::new(agent_names::RISKS, action_items_output(0));
    let scheduler = scheduler_with(vec![Arc::new(upstream), Arc::new(downstream)]);

    let mut plan = TaskPlan::from_tasks(vec![
        task("TASK-001", agent_names::ACTION_ITEMS, &[]),
        task("TASK-002", agent_names::RISKS, &["TASK-001"]),
    ]);
    scheduler.execute(&mut plan, "the message").await;

    let seen = seen.lock().unwrap();
    assert!(seen[0].contains(PREVIOUS_RESULTS_DELIMITER));
    assert!(seen[0].contains("Extracted from TASK-001: 2 items"));
    assert!(seen[0].starts_with("the message\n\n"));
}

#[tokio::test]
async fn test_drafted_response_is_forwarded_in_full() {
    let (qna, _) = StubAgent::new(agent_names::QNA, qna_output("Here is the status summary."));
    let (eval, seen) = StubAgent::new(agent_names::EVALUATION, action_items_output(0));
    let scheduler = scheduler_with(vec![Arc::new(qna), Arc::new(eval)]);

    let mut plan = TaskPlan::from_tasks(vec![
        task("TASK-001", agent_names::QNA, &[]),
        task("TASK-002", agent_names::EVALUATION, &["TASK-001"]),
    ]);
    scheduler.execute(&mut plan, "what is the status?").await;

    let seen = seen.lock().unwrap();
    assert!(seen[0].contains("Response to evaluate:\nHere is the status summary."));
}

#[tokio::test]
async fn test_empty_dependency_output_adds_no_context() {
    let (upstream, _) = StubAgent::new(agent_names::ACTION_ITEMS, action_items_output(0));
    let (downstream, seen) = StubAgent::new(agent_names::RISKS, action_items_output(0));
    let scheduler = scheduler_with(vec![Arc::new(upstream), Arc::new(downstream)]);

    let mut plan = TaskPlan::from_tasks(vec![
        task("TASK-001", agent_names::ACTION_ITEMS, &[]),
        task("TASK-002", agent_names::RISKS, &["TASK-001"]),
    ]);
    scheduler.execute(&mut plan, "the message").await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0], "the message");
}

#[tokio::test]
async fn test_unresolvable_task_fails_with_reason() {
    let scheduler = scheduler_with(Vec::new());
    let mut plan = TaskPlan::from_tasks(vec![task("TASK-001", agent_names::QNA, &[])]);
    let results = scheduler.execute(&mut plan, "anything").await;

    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
    assert_eq!(results[0].status, TaskStatus::Failed);
    assert_eq!(
        results[0].error.as_deref(),
        Some("No agent found for task: TASK-001")
    );
    assert_eq!(results[0].output, None);
}

#[tokio::test]
async fn test_cycle_still_runs_every_task_once() {
    let (a, seen) = StubAgent::new(agent_names::ACTION_ITEMS, action_items_output(1));
    let scheduler = scheduler_with(vec![Arc::new(a)]);

    let mut plan = TaskPlan::from_tasks(vec![
        task("TASK-001", agent_names::ACTION_ITEMS, &["TASK-002"]),
        task("TASK-002", agent_names::ACTION_ITEMS, &["TASK-001"]),
    ]);
    assert!(plan.has_circular_dependency());
    let results = scheduler.execute(&mut plan, "the message").await;

    assert_eq!(results.len(), 2);
    assert_eq!(seen.lock().unwrap().len(), 2);
    assert!(results.iter().all(|r| r.success));
}

#[tokio::test]
async fn test_domain_fallback_reports_resolved_agent() {
    let (a, _) = StubAgent::new(agent_names::ACTION_ITEMS, action_items_output(1));
    let scheduler = scheduler_with(vec![Arc::new(a)]);

    // No explicit agent: TRACKING_EXECUTION falls back to action items.
    let mut plan = TaskPlan::from_tasks(vec![PlannedTask::new(
        "TASK-001",
        TaskDomain::TrackingExecution,
        "untargeted work",
    )]);
    let results = scheduler.execute(&mut plan, "the message").await;

    assert!(results[0].success);
    assert_eq!(results[0].agent.as_deref(), Some(agent_names::ACTION_ITEMS));
}

#[tokio::test]
async fn test_unknown_explicit_agent_falls_back_to_domain_default() {
    let (a, _) = StubAgent::new(agent_names::ACTION_ITEMS, action_items_output(1));
    let scheduler = scheduler_with(vec![Arc::new(a)]);

    let mut plan = TaskPlan::from_tasks(vec![task("TASK-001", "sentiment_analysis", &[])]);
    let results = scheduler.execute(&mut plan, "the message").await;

    assert!(results[0].success);
    // The explicit (unknown) name is kept for reporting.
    assert_eq!(results[0].agent.as_deref(), Some("sentiment_analysis"));
    assert!(results[0].output.is_some());
}

// ============================================================================
// Planner
// ============================================================================

const THREE_TASK_PLAN: &str = r#"{
    "tasks": [
        {"task_id": "TASK-001", "domain": "TRACKING_EXECUTION", "l3_agent": "action_item_extraction",
         "description": "Extract action items", "purpose": "Track commitments", "priority": "high", "depends_on": []},
        {"task_id": "TASK-002", "domain": "TRACKING_EXECUTION", "l3_agent": "risk_extraction",
         "description": "Extract risks", "priority": "medium", "depends_on": []},
        {"task_id": "TASK-003", "domain": "COMMUNICATION_COLLABORATION", "l3_agent": "qna",
         "description": "Draft a response", "priority": "medium", "depends_on": ["TASK-001", "TASK-002"]}
    ]
}"#;

fn message() -> Message {
    Message::new("MSG-100", "Please review the launch plan by Friday.")
}

#[tokio::test]
async fn test_planner_parses_complete_plan() {
    let planner = Planner::new(Arc::new(StaticClient::new(THREE_TASK_PLAN)));
    let result = planner.plan(&message()).await;

    assert!(result.success);
    assert_eq!(result.plan.len(), 3);
    assert_eq!(result.plan.source_message_id, "MSG-100");
    assert!(result.raw_response.is_some());

    let first = result.plan.get("TASK-001").unwrap();
    assert_eq!(first.l3_agent.as_deref(), Some("action_item_extraction"));
    assert_eq!(first.purpose.as_deref(), Some("Track commitments"));
    let third = result.plan.get("TASK-003").unwrap();
    assert_eq!(third.depends_on, vec!["TASK-001", "TASK-002"]);
}

#[tokio::test]
async fn test_planner_handles_markdown_fenced_plan() {
    let fenced = format!("Here is the plan:\n```json\n{}\n```", THREE_TASK_PLAN);
    let planner = Planner::new(Arc::new(StaticClient::new(fenced)));
    let result = planner.plan(&message()).await;
    assert!(result.success);
    assert_eq!(result.plan.len(), 3);
}

#[tokio::test]
async fn test_planner_garbage_response_yields_empty_plan() {
    let planner = Planner::new(Arc::new(StaticClient::new("I refuse to answer in JSON.")));
    let result = planner.plan(&message()).await;
    // The attempt succeeded; the plan is just empty.
    assert!(result.success);
    assert!(result.plan.is_empty());
    assert_eq!(result.plan.source_message_id, "MSG-100");
}

#[tokio::test]
async fn test_planner_drops_invalid_tasks_keeps_valid() {
    let mixed = r#"{
        "tasks": [
            {"task_id": "TASK-001", "domain": "TRACKING_EXECUTION", "description": "good"},
            {"task_id": "TASK-002", "domain": "SPACE_EXPLORATION", "description": "bad domain"},
            {"task_id": "TASK-003", "domain": "LEARNING_IMPROVEMENT"},
            {"task_id": "TASK-004", "domain": "LEARNING_IMPROVEMENT", "description": "also good"}
        ]
    }"#;
    let planner = Planner::new(Arc::new(StaticClient::new(mixed)));
    let result = planner.plan(&message()).await;
    assert!(result.success);
    let ids: Vec<&str> = result
        .plan
        .tasks
        .iter()
        .map(|t| t.task_id.as_str())
        .collect();
    assert_eq!(ids, vec!["TASK-001", "TASK-004"]);
}

#[tokio::test]
async fn test_planner_truncates_oversized_plans() {
    let tasks: Vec<String> = (1..=6)
        .map(|i| {
            format!(
                r#"{{"task_id": "TASK-{:03}", "domain": "TRACKING_EXECUTION", "description": "t{}"}}"#,
                i, i
            )
        })
        .collect();
    let response = format!(r#"{{"tasks": [{}]}}"#, tasks.join(","));
    let planner = Planner::new(Arc::new(StaticClient::new(response))).with_max_tasks(4);
    let result = planner.plan(&message()).await;
    assert_eq!(result.plan.len(), 4);
    assert_eq!(result.plan.tasks[3].task_id, "TASK-004");
}

#[tokio::test]
async fn test_planner_applies_configured_default_priority() {
    let response = r#"{
        "tasks": [
            {"task_id": "TASK-001", "domain": "TRACKING_EXECUTION", "description": "no priority"},
            {"task_id": "TASK-002", "domain": "TRACKING_EXECUTION", "description": "explicit", "priority": "low"}
        ]
    }"#;
    let planner =
        Planner::new(Arc::new(StaticClient::new(response))).with_default_priority(TaskPriority::High);
    let result = planner.plan(&message()).await;
    assert_eq!(result.plan.tasks[0].priority, TaskPriority::High);
    assert_eq!(result.plan.tasks[1].priority, TaskPriority::Low);
}

#[tokio::test]
async fn test_planner_llm_failure_reports_error() {
    let planner = Planner::new(Arc::new(FailingClient));
    let result = planner.plan(&message()).await;
    assert!(!result.success);
    assert!(result.plan.is_empty());
    assert!(result.raw_response.is_none());
    assert!(
        result
            .error
            .as_deref()
            .is_some_and(|e| e.contains("connection refused"))
    );
}
