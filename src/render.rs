//! Plain-text rendering of a plan and its execution results into the
//! orchestration map shown to operators.
//!
//! Rendering is pure: it formats whatever it is given and never consults
//! the store or the clock.

use serde_json::Value;

use crate::agents::{ExtractionOutput, QnAResponse};
use crate::orchestrator::RoutingResult;
use crate::plan::{PlannedTask, TaskPlan};

const MAP_WIDTH: usize = 74;
/// Longest response excerpt shown in the map
const RESPONSE_PREVIEW_CHARS: usize = 200;

/// Render the full orchestration map for one processed message.
pub fn render_orchestration_map(plan: &TaskPlan, results: &[RoutingResult]) -> String {
    let separator = "=".repeat(MAP_WIDTH);
    let rule = "-".repeat(MAP_WIDTH);
    let mut lines: Vec<String> = Vec::new();

    lines.push(separator.clone());
    lines.push("ORCHESTRATION MAP".to_string());
    lines.push(separator.clone());
    lines.push(format!("Message: {}", plan.source_message_id));
    if let Some(message) = &plan.source_message {
        lines.push(format!(
            "From: {} ({})",
            message.sender.name,
            message.sender.role.as_deref().unwrap_or("Unknown")
        ));
        if let Some(project) = &message.project {
            lines.push(format!("Project: {}", project));
        }
    }
    lines.push(separator.clone());

    lines.push(String::new());
    lines.push("L1 PLAN".to_string());
    lines.push(rule.clone());
    if plan.is_empty() {
        lines.push("No tasks identified.".to_string());
    } else {
        for task in &plan.tasks {
            lines.push(task_heading(task));
            lines.push(format!(
                "    Purpose: {}",
                task.purpose.as_deref().unwrap_or(&task.description)
            ));
            if !task.depends_on.is_empty() {
                lines.push(format!("    Depends On: {}", task.depends_on.join(", ")));
            }
        }
    }

    lines.push(String::new());
    lines.push("L2/L3 EXECUTION".to_string());
    lines.push(rule);
    for result in results {
        lines.push(task_heading(&result.task));
        lines.push(format!(
            "  └─▶ [{}-A] L3:{}",
            result.task.task_id,
            result.agent.as_deref().unwrap_or("unknown")
        ));
        lines.push(format!("      Status: {}", result.status));
        if let Some(error) = &result.error {
            lines.push(format!("      Error: {}", error));
        } else {
            lines.push("      Output:".to_string());
            match &result.output {
                Some(output) => render_output(&mut lines, output),
                None => lines.push("      • No output".to_string()),
            }
        }
        lines.push(String::new());
    }

    lines.push(separator);
    lines.join("\n")
}

fn task_heading(task: &PlannedTask) -> String {
    match &task.l3_agent {
        Some(agent) => format!("[{}] → L3:{} (Cross-Cutting)", task.task_id, agent),
        None => format!("[{}] → L2:{}", task.task_id, task.domain),
    }
}

fn render_output(lines: &mut Vec<String>, output: &ExtractionOutput) {
    match output {
        ExtractionOutput::ActionItems(result) => {
            if result.items.is_empty() {
                lines.push("      • No action items found".to_string());
            }
            for item in &result.items {
                lines.push(format!(
                    "      • {}: \"{}\"",
                    item.id.as_deref().unwrap_or("AI-XXX"),
                    item.action
                ));
                let mut detail = format!(
                    "        Owner: {} | Due: {}",
                    item.owner.as_deref().unwrap_or("?"),
                    item.deadline.as_deref().unwrap_or("?")
                );
                if !item.flags.is_empty() {
                    let flags: Vec<&str> = item.flags.iter().map(|f| f.as_str()).collect();
                    detail.push_str(&format!(" [{}]", flags.join(", ")));
                }
                lines.push(detail);
            }
        }
        ExtractionOutput::Risks(result) => {
            if result.items.is_empty() {
                lines.push("      • No risks found".to_string());
            }
            for risk in &result.items {
                lines.push(format!(
                    "      • {}: \"{}\"",
                    risk.id.as_deref().unwrap_or("RISK-XXX"),
                    risk.description
                ));
                lines.push(format!(
                    "        Likelihood: {} | Impact: {}",
                    risk.likelihood, risk.impact
                ));
            }
        }
        ExtractionOutput::Decisions(result) => {
            if result.items.is_empty() {
                lines.push("      • No decisions found".to_string());
            }
            for decision in &result.items {
                lines.push(format!(
                    "      • {}: \"{}\"",
                    decision.id.as_deref().unwrap_or("DEC-XXX"),
                    decision.decision
                ));
                lines.push(format!(
                    "        Decision Maker: {} | Status: {}",
                    decision.decision_maker.as_deref().unwrap_or("?"),
                    decision.status
                ));
            }
        }
        ExtractionOutput::Knowledge(result) => {
            if let Some(project) = &result.project {
                lines.push(format!("      • Project: {}", project));
            }
            for (key, value) in &result.items {
                lines.push(format!("      • {}: {}", title_case(key), value_text(value)));
            }
        }
        ExtractionOutput::Qna(result) => render_qna(lines, result),
        ExtractionOutput::Evaluation(result) => {
            lines.push(format!("      • Relevance: {}", result.relevance));
            lines.push(format!("      • Accuracy: {}", result.accuracy));
            lines.push(format!("      • Tone: {}", result.tone));
            lines.push(format!(
                "      • Gaps Acknowledged: {}",
                result.gaps_acknowledged
            ));
            lines.push(format!("      • Result: {}", result.result));
            if let Some(feedback) = &result.feedback {
                lines.push(format!("      • Feedback: {}", feedback));
            }
        }
        ExtractionOutput::Delivery(receipt) => {
            lines.push(format!("      • Channel: {}", receipt.channel));
            lines.push(format!("      • Recipient: {}", receipt.recipient));
            if !receipt.cc.is_empty() {
                lines.push(format!("      • CC: {}", receipt.cc.join(", ")));
            }
            lines.push(format!(
                "      • Delivery Status: {}",
                receipt.delivery_status
            ));
        }
    }
}

fn render_qna(lines: &mut Vec<String>, result: &QnAResponse) {
    let mut preview: String = result.response.chars().take(RESPONSE_PREVIEW_CHARS).collect();
    if result.response.chars().count() > RESPONSE_PREVIEW_CHARS {
        preview.push_str("...");
    }
    lines.push(format!("      • Response: \"{}\"", preview));
    let sections = [
        ("WHAT I KNOW:", &result.what_i_know),
        ("WHAT I'VE LOGGED:", &result.what_i_logged),
        ("WHAT I NEED:", &result.what_i_need),
    ];
    for (heading, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        lines.push(format!("      {}", heading));
        for entry in entries {
            lines.push(format!("      • {}", entry));
        }
    }
}

/// "current_release_date" becomes "Current Release Date"
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Strings render bare; everything else renders as JSON
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
