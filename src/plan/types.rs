use crate::message::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Business domain a task belongs to; selects the default extraction agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskDomain {
    TrackingExecution,
    CommunicationCollaboration,
    LearningImprovement,
}

impl TaskDomain {
    /// Wire name of the domain
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskDomain::TrackingExecution => "TRACKING_EXECUTION",
            TaskDomain::CommunicationCollaboration => "COMMUNICATION_COLLABORATION",
            TaskDomain::LearningImprovement => "LEARNING_IMPROVEMENT",
        }
    }
}

impl fmt::Display for TaskDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority, ordered from least to most urgent
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a planned task
///
/// Transitions: `Pending -> Routing -> Executing -> Completed | Failed`.
/// Routing fails directly when no agent resolves for the task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    Routing,
    Executing,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Routing => "ROUTING",
            TaskStatus::Executing => "EXECUTING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
        }
    }

    /// Check if the task reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Check if the task is currently being routed or executed
    pub fn is_in_progress(&self) -> bool {
        matches!(self, TaskStatus::Routing | TaskStatus::Executing)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single planned unit of work produced by the planner
///
/// `l3_agent` stays a free-form string: the planner model may suggest agent
/// names the registry does not know, and those must degrade to the domain
/// default at routing time instead of failing validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTask {
    pub task_id: String,
    pub domain: TaskDomain,
    #[serde(default)]
    pub l3_agent: Option<String>,
    pub description: String,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub status: TaskStatus,
}

impl PlannedTask {
    /// Create a pending task with the given id, domain, and description
    pub fn new(
        task_id: impl Into<String>,
        domain: TaskDomain,
        description: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            domain,
            l3_agent: None,
            description: description.into(),
            purpose: None,
            priority: TaskPriority::default(),
            depends_on: Vec::new(),
            status: TaskStatus::default(),
        }
    }

    /// Request a specific extraction agent instead of the domain default
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.l3_agent = Some(agent.into());
        self
    }

    /// Set the task's purpose
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Set the task's priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Declare dependencies on other task ids
    pub fn with_dependencies(mut self, depends_on: Vec<String>) -> Self {
        self.depends_on = depends_on;
        self
    }
}

/// Ordered set of tasks planned for one message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPlan {
    pub tasks: Vec<PlannedTask>,
    pub source_message_id: String,
    #[serde(default)]
    pub source_message: Option<Message>,
}

impl TaskPlan {
    /// Create a plan for a message with the given tasks
    pub fn new(message: &Message, tasks: Vec<PlannedTask>) -> Self {
        Self {
            tasks,
            source_message_id: message.message_id.clone(),
            source_message: Some(message.clone()),
        }
    }

    /// Create an empty plan for a message
    pub fn empty_for(message: &Message) -> Self {
        Self::new(message, Vec::new())
    }

    /// Create a plan from tasks alone, without a backing message
    pub fn from_tasks(tasks: Vec<PlannedTask>) -> Self {
        Self {
            tasks,
            source_message_id: String::new(),
            source_message: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by id
    pub fn get(&self, task_id: &str) -> Option<&PlannedTask> {
        self.tasks.iter().find(|task| task.task_id == task_id)
    }

    /// Check whether a task id exists in this plan
    pub fn contains(&self, task_id: &str) -> bool {
        self.get(task_id).is_some()
    }
}
