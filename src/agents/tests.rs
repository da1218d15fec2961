use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::BoxFuture;

use crate::agents::*;
use crate::llm::{CompletionRequest, LLMClient, LLMError, StaticClient};
use crate::plan::TaskDomain;

/// Canned client that counts how many completions were requested.
struct CountingClient {
    response: String,
    calls: Arc<AtomicUsize>,
}

impl CountingClient {
    fn new(response: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                response: response.to_string(),
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl LLMClient for CountingClient {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, Result<String, LLMError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.clone();
        Box::pin(async move { Ok(response) })
    }
}

#[tokio::test]
async fn test_empty_content_skips_llm() {
    let (client, calls) = CountingClient::new(r#"{"items": []}"#);
    let agent = ActionItemAgent::new(Arc::new(client));
    let output = agent.extract("   ", Some("TASK-001")).await.unwrap();
    assert_eq!(output, agent.empty_output());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_action_items_gap_annotation() {
    let response = r#"{
        "items": [
            {"id": "AI-001", "action": "ship the report", "owner": "?", "deadline": null, "status": "pending", "flags": []},
            {"id": "AI-002", "action": "book the room", "owner": "Dana", "deadline": "2026-09-01", "status": "pending", "flags": []}
        ]
    }"#;
    let agent = ActionItemAgent::new(Arc::new(StaticClient::new(response)));
    let output = agent.extract("please handle these", Some("TASK-001")).await.unwrap();

    let ExtractionOutput::ActionItems(result) = output else {
        panic!("expected action items");
    };
    assert_eq!(result.source_task_id.as_deref(), Some("TASK-001"));
    assert_eq!(result.items.len(), 2);
    assert!(result.items[0].flags.contains(&GapFlag::MissingOwner));
    assert!(result.items[0].flags.contains(&GapFlag::MissingDueDate));
    assert!(result.items[1].flags.is_empty());
}

#[tokio::test]
async fn test_parse_failure_degrades_to_empty() {
    let agent = ActionItemAgent::new(Arc::new(StaticClient::new("I could not comply.")));
    let output = agent.extract("some content", None).await.unwrap();
    let ExtractionOutput::ActionItems(result) = output else {
        panic!("expected action items");
    };
    assert!(result.items.is_empty());
    assert_eq!(result.source_task_id, None);
}

#[tokio::test]
async fn test_risk_extraction_parses_ratings() {
    let response = r#"{
        "items": [
            {"id": "RISK-001", "description": "vendor slips", "likelihood": "HIGH", "impact": "LOW", "mitigation": null, "owner": null}
        ]
    }"#;
    let agent = RiskAgent::new(Arc::new(StaticClient::new(response)));
    let output = agent.extract("vendor might slip", Some("TASK-002")).await.unwrap();
    let ExtractionOutput::Risks(result) = output else {
        panic!("expected risks");
    };
    assert_eq!(result.items[0].likelihood, RiskRating::High);
    assert_eq!(result.items[0].impact, RiskRating::Low);
    assert_eq!(result.source_task_id.as_deref(), Some("TASK-002"));
}

#[tokio::test]
async fn test_decision_status_defaults_to_pending() {
    let response = r#"{"items": [{"id": "DEC-001", "decision": "pick a vendor"}]}"#;
    let agent = DecisionAgent::new(Arc::new(StaticClient::new(response)));
    let output = agent.extract("we need to pick", None).await.unwrap();
    let ExtractionOutput::Decisions(result) = output else {
        panic!("expected decisions");
    };
    assert_eq!(result.items[0].status, DecisionStatus::Pending);
    assert_eq!(result.items[0].decision_maker, None);
}

#[tokio::test]
async fn test_knowledge_project_injection() {
    let response = r#"{"project": null, "items": {"status": "on track", "days_remaining": 20}}"#;
    let agent = KnowledgeAgent::new(Arc::new(StaticClient::new(response)));
    let output = agent
        .extract_for_project("context please", None, Some("PROJ-APOLLO"))
        .await
        .unwrap();
    let ExtractionOutput::Knowledge(result) = output else {
        panic!("expected knowledge");
    };
    assert_eq!(result.project.as_deref(), Some("PROJ-APOLLO"));
    assert_eq!(result.items.len(), 2);

    // A project the model filled in is kept.
    let response = r#"{"project": "PROJ-OTHER", "items": {}}"#;
    let agent = KnowledgeAgent::new(Arc::new(StaticClient::new(response)));
    let output = agent
        .extract_for_project("context please", None, Some("PROJ-APOLLO"))
        .await
        .unwrap();
    let ExtractionOutput::Knowledge(result) = output else {
        panic!("expected knowledge");
    };
    assert_eq!(result.project.as_deref(), Some("PROJ-OTHER"));
}

#[tokio::test]
async fn test_qna_empty_output_shape() {
    let agent = QnAAgent::new(Arc::new(StaticClient::new("{}")));
    let ExtractionOutput::Qna(empty) = agent.empty_output() else {
        panic!("expected qna");
    };
    assert!(empty.response.contains("insufficient context"));
    assert_eq!(empty.what_i_need, vec!["More context required".to_string()]);
}

#[tokio::test]
async fn test_evaluation_auto_approves_without_response() {
    let (client, calls) = CountingClient::new("{}");
    let agent = EvaluationAgent::new(Arc::new(client));
    let output = agent
        .extract("Extract the action items from this note.", Some("TASK-006"))
        .await
        .unwrap();
    let ExtractionOutput::Evaluation(result) = output else {
        panic!("expected evaluation");
    };
    assert_eq!(result.result, EvaluationVerdict::Approved);
    assert_eq!(
        result.feedback.as_deref(),
        Some("No explicit response to evaluate - extraction tasks completed successfully")
    );
    assert_eq!(result.source_task_id.as_deref(), Some("TASK-006"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_evaluation_lenient_on_minor_failures() {
    let response = r#"{
        "relevance": "PASS", "accuracy": "FAIL", "tone": "FAIL",
        "gaps_acknowledged": "PASS", "result": "REJECTED", "feedback": "tone is off"
    }"#;
    let agent = EvaluationAgent::new(Arc::new(StaticClient::new(response)));
    let output = agent
        .extract("Response to evaluate:\nHello team, status below.", None)
        .await
        .unwrap();
    let ExtractionOutput::Evaluation(result) = output else {
        panic!("expected evaluation");
    };
    assert_eq!(result.result, EvaluationVerdict::Approved);
    assert_eq!(
        result.feedback.as_deref(),
        Some("Auto-approved with 2 minor issues noted")
    );
}

#[tokio::test]
async fn test_evaluation_rejection_sticks_with_major_failures() {
    let response = r#"{
        "relevance": "FAIL", "accuracy": "FAIL", "tone": "FAIL",
        "gaps_acknowledged": "PASS", "result": "REJECTED", "feedback": "way off"
    }"#;
    let agent = EvaluationAgent::new(Arc::new(StaticClient::new(response)));
    let output = agent
        .extract("Response to evaluate:\nwhatever", None)
        .await
        .unwrap();
    let ExtractionOutput::Evaluation(result) = output else {
        panic!("expected evaluation");
    };
    assert_eq!(result.result, EvaluationVerdict::Rejected);
    assert_eq!(result.feedback.as_deref(), Some("way off"));
}

#[tokio::test]
async fn test_delivery_context_overrides() {
    let response = r#"{"channel": "slack", "recipient": "Somebody", "cc": ["PM"], "delivery_status": "PENDING"}"#;
    let agent = DeliveryAgent::new(Arc::new(StaticClient::new(response)));
    let output = agent
        .extract_with_context("send the reply", None, Some("email"), Some("Jordan Lee"))
        .await
        .unwrap();
    let ExtractionOutput::Delivery(receipt) = output else {
        panic!("expected delivery");
    };
    assert_eq!(receipt.channel, "email");
    assert_eq!(receipt.recipient, "Jordan Lee");
    assert_eq!(receipt.cc, vec!["PM".to_string()]);
    assert_eq!(receipt.delivery_status, DeliveryStatus::Sent);
}

#[test]
fn test_registry_builds_all_agents() {
    let registry = AgentRegistry::new(Arc::new(StaticClient::new("{}")));
    assert_eq!(registry.len(), 7);
    assert_eq!(
        registry.names(),
        vec![
            agent_names::ACTION_ITEMS,
            agent_names::DECISIONS,
            agent_names::EVALUATION,
            agent_names::KNOWLEDGE,
            agent_names::DELIVERY,
            agent_names::QNA,
            agent_names::RISKS,
        ]
    );
    assert!(registry.get(agent_names::QNA).is_some());
    assert!(registry.get("no_such_agent").is_none());
}

#[test]
fn test_domain_defaults() {
    let registry = AgentRegistry::new(Arc::new(StaticClient::new("{}")));
    let cases = [
        (TaskDomain::TrackingExecution, agent_names::ACTION_ITEMS),
        (TaskDomain::CommunicationCollaboration, agent_names::QNA),
        (TaskDomain::LearningImprovement, agent_names::DECISIONS),
    ];
    for (domain, expected) in cases {
        let agent = registry.domain_default(domain).unwrap();
        assert_eq!(agent.name(), expected);
    }

    assert!(AgentRegistry::empty()
        .domain_default(TaskDomain::TrackingExecution)
        .is_none());
}

#[test]
fn test_extraction_output_helpers() {
    let items = ExtractionOutput::ActionItems(ActionItemsResult {
        items: vec![ActionItem {
            id: Some("AI-001".to_string()),
            action: "do the thing".to_string(),
            owner: None,
            deadline: None,
            status: ItemStatus::Pending,
            flags: Vec::new(),
        }],
        ..Default::default()
    });
    assert_eq!(items.kind(), "action_items");
    assert_eq!(items.item_count(), Some(1));
    assert_eq!(items.primary_response(), None);

    let qna = ExtractionOutput::Qna(QnAResponse {
        response: "here you go".to_string(),
        ..Default::default()
    });
    assert_eq!(qna.kind(), "qna");
    assert_eq!(qna.item_count(), None);
    assert_eq!(qna.primary_response(), Some("here you go"));
}

#[test]
fn test_extraction_output_tagged_serde() {
    let receipt = ExtractionOutput::Delivery(DeliveryReceipt {
        channel: "email".to_string(),
        recipient: "Sam".to_string(),
        cc: Vec::new(),
        delivery_status: DeliveryStatus::Sent,
        source_task_id: Some("TASK-007".to_string()),
    });
    let json = serde_json::to_value(&receipt).unwrap();
    assert_eq!(json["kind"], "delivery");
    assert_eq!(json["delivery_status"], "SENT");

    let back: ExtractionOutput = serde_json::from_value(json).unwrap();
    assert_eq!(back, receipt);
}
