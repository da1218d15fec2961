//! Typed extraction records produced by the L3 agents.
//!
//! Field names and enum wire forms mirror the JSON schemas in the agent
//! prompts, with serde aliases for the spellings models commonly drift to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Action Items
// ============================================================================

/// Marker for information an extraction could not pin down
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapFlag {
    MissingOwner,
    MissingDueDate,
    MissingContext,
    NeedsClarification,
}

impl GapFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            GapFlag::MissingOwner => "MISSING_OWNER",
            GapFlag::MissingDueDate => "MISSING_DUE_DATE",
            GapFlag::MissingContext => "MISSING_CONTEXT",
            GapFlag::NeedsClarification => "NEEDS_CLARIFICATION",
        }
    }
}

impl fmt::Display for GapFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Completed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::InProgress => "in_progress",
            ItemStatus::Done => "done",
            ItemStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single task or to-do pulled from the content
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ActionItem {
    #[serde(default)]
    pub id: Option<String>,
    pub action: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, alias = "due")]
    pub deadline: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub flags: Vec<GapFlag>,
}

impl ActionItem {
    /// Flag missing or placeholder owner and deadline, without duplicating
    /// flags the model already set
    pub fn annotate_gaps(&mut self) {
        let owner_missing = self
            .owner
            .as_deref()
            .is_none_or(|o| o.trim().is_empty() || o.trim() == "?");
        if owner_missing && !self.flags.contains(&GapFlag::MissingOwner) {
            self.flags.push(GapFlag::MissingOwner);
        }
        let deadline_missing = self
            .deadline
            .as_deref()
            .is_none_or(|d| d.trim().is_empty() || d.trim() == "?");
        if deadline_missing && !self.flags.contains(&GapFlag::MissingDueDate) {
            self.flags.push(GapFlag::MissingDueDate);
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ActionItemsResult {
    #[serde(default)]
    pub items: Vec<ActionItem>,
    #[serde(default)]
    pub source_task_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub extracted_at: DateTime<Utc>,
}

impl Default for ActionItemsResult {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            source_task_id: None,
            extracted_at: Utc::now(),
        }
    }
}

impl ActionItemsResult {
    pub fn annotate_gaps(&mut self) {
        for item in &mut self.items {
            item.annotate_gaps();
        }
    }
}

// ============================================================================
// Risks
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskRating {
    High,
    #[default]
    Medium,
    Low,
}

impl RiskRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskRating::High => "HIGH",
            RiskRating::Medium => "MEDIUM",
            RiskRating::Low => "LOW",
        }
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A risk, blocker, or concern pulled from the content
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Risk {
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub likelihood: RiskRating,
    #[serde(default)]
    pub impact: RiskRating,
    #[serde(default)]
    pub mitigation: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RisksResult {
    #[serde(default)]
    pub items: Vec<Risk>,
    #[serde(default)]
    pub source_task_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub extracted_at: DateTime<Utc>,
}

impl Default for RisksResult {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            source_task_id: None,
            extracted_at: Utc::now(),
        }
    }
}

// ============================================================================
// Decisions
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Deferred,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Pending => "PENDING",
            DecisionStatus::Approved => "APPROVED",
            DecisionStatus::Rejected => "REJECTED",
            DecisionStatus::Deferred => "DEFERRED",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decision that was made or still needs to be made
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    #[serde(default)]
    pub id: Option<String>,
    pub decision: String,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default, alias = "made_by")]
    pub decision_maker: Option<String>,
    #[serde(default)]
    pub status: DecisionStatus,
    #[serde(default)]
    pub effective_date: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DecisionsResult {
    #[serde(default)]
    pub items: Vec<Decision>,
    #[serde(default)]
    pub source_task_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub extracted_at: DateTime<Utc>,
}

impl Default for DecisionsResult {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            source_task_id: None,
            extracted_at: Utc::now(),
        }
    }
}

// ============================================================================
// Knowledge
// ============================================================================

/// Project context retrieved (or mocked) for a message.
///
/// The item set is open-ended, so it stays a JSON map instead of a struct.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct KnowledgeResult {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub items: serde_json::Map<String, Value>,
    #[serde(default)]
    pub source_task_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub extracted_at: DateTime<Utc>,
}

impl Default for KnowledgeResult {
    fn default() -> Self {
        Self {
            project: None,
            items: serde_json::Map::new(),
            source_task_id: None,
            extracted_at: Utc::now(),
        }
    }
}

// ============================================================================
// Q&A
// ============================================================================

/// Gap-aware response drafted for the sender
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct QnAResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub what_i_know: Vec<String>,
    #[serde(default)]
    pub what_i_logged: Vec<String>,
    #[serde(default)]
    pub what_i_need: Vec<String>,
    #[serde(default)]
    pub source_task_id: Option<String>,
}

// ============================================================================
// Evaluation
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckResult {
    #[default]
    Pass,
    Fail,
}

impl CheckResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckResult::Pass => "PASS",
            CheckResult::Fail => "FAIL",
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationVerdict {
    #[default]
    Approved,
    Rejected,
    NeedsRevision,
}

impl EvaluationVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationVerdict::Approved => "APPROVED",
            EvaluationVerdict::Rejected => "REJECTED",
            EvaluationVerdict::NeedsRevision => "NEEDS_REVISION",
        }
    }
}

impl fmt::Display for EvaluationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quality gate verdict for a drafted response
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EvaluationResult {
    #[serde(default)]
    pub relevance: CheckResult,
    #[serde(default)]
    pub accuracy: CheckResult,
    #[serde(default)]
    pub tone: CheckResult,
    #[serde(default)]
    pub gaps_acknowledged: CheckResult,
    #[serde(default)]
    pub result: EvaluationVerdict,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub source_task_id: Option<String>,
}

impl EvaluationResult {
    /// Number of the four axes that failed
    pub fn failure_count(&self) -> usize {
        [self.relevance, self.accuracy, self.tone, self.gaps_acknowledged]
            .into_iter()
            .filter(|c| *c == CheckResult::Fail)
            .count()
    }
}

// ============================================================================
// Delivery
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Sent,
    #[default]
    Pending,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "SENT",
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery metadata for an outbound response
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub channel: String,
    pub recipient: String,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    #[serde(default)]
    pub source_task_id: Option<String>,
}

impl Default for DeliveryReceipt {
    fn default() -> Self {
        Self {
            channel: "email".to_string(),
            recipient: "Unknown".to_string(),
            cc: Vec::new(),
            delivery_status: DeliveryStatus::Pending,
            source_task_id: None,
        }
    }
}

// ============================================================================
// Unified output
// ============================================================================

/// Everything an L3 agent can hand back, tagged for storage and rendering
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionOutput {
    ActionItems(ActionItemsResult),
    Risks(RisksResult),
    Decisions(DecisionsResult),
    Knowledge(KnowledgeResult),
    Qna(QnAResponse),
    Evaluation(EvaluationResult),
    Delivery(DeliveryReceipt),
}

impl ExtractionOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionOutput::ActionItems(_) => "action_items",
            ExtractionOutput::Risks(_) => "risks",
            ExtractionOutput::Decisions(_) => "decisions",
            ExtractionOutput::Knowledge(_) => "knowledge",
            ExtractionOutput::Qna(_) => "qna",
            ExtractionOutput::Evaluation(_) => "evaluation",
            ExtractionOutput::Delivery(_) => "delivery",
        }
    }

    /// Count of extracted items for list-shaped outputs
    pub fn item_count(&self) -> Option<usize> {
        match self {
            ExtractionOutput::ActionItems(r) => Some(r.items.len()),
            ExtractionOutput::Risks(r) => Some(r.items.len()),
            ExtractionOutput::Decisions(r) => Some(r.items.len()),
            ExtractionOutput::Knowledge(r) => Some(r.items.len()),
            _ => None,
        }
    }

    /// The drafted response text, when this output carries one
    pub fn primary_response(&self) -> Option<&str> {
        match self {
            ExtractionOutput::Qna(r) => Some(&r.response),
            _ => None,
        }
    }
}
