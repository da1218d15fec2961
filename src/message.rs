//! Inbound message model.
//!
//! Messages arrive from heterogeneous sources (email exports, chat dumps,
//! hand-written JSON), so deserialization is tolerant: common field aliases
//! are accepted and everything except the content has a sensible default.

use serde::{Deserialize, Serialize};

/// Who sent the message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SenderRepr")]
pub struct Sender {
    pub name: String,
    pub role: Option<String>,
}

/// Accepts either a bare name string or a full `{ name, role }` object
#[derive(Deserialize)]
#[serde(untagged)]
enum SenderRepr {
    Name(String),
    Full {
        #[serde(default = "default_sender_name")]
        name: String,
        #[serde(default)]
        role: Option<String>,
    },
}

impl From<SenderRepr> for Sender {
    fn from(repr: SenderRepr) -> Self {
        match repr {
            SenderRepr::Name(name) => Self { name, role: None },
            SenderRepr::Full { name, role } => Self { name, role },
        }
    }
}

impl Default for Sender {
    fn default() -> Self {
        Self {
            name: default_sender_name(),
            role: None,
        }
    }
}

impl Sender {
    /// Create a sender with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
        }
    }

    /// Set the sender's role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

fn default_sender_name() -> String {
    "Unknown".to_string()
}

fn default_source() -> String {
    "email".to_string()
}

/// An inbound message to orchestrate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Caller-supplied id; a blank id gets replaced with a generated one downstream
    #[serde(default, alias = "id")]
    pub message_id: String,
    /// Where the message came from ("email", "slack", ...)
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub sender: Sender,
    /// The message body to analyze
    #[serde(alias = "body")]
    pub content: String,
    /// Project the message relates to, when known
    #[serde(default)]
    pub project: Option<String>,
}

impl Message {
    /// Create a message with an id and content; everything else defaults
    pub fn new(message_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            source: default_source(),
            sender: Sender::default(),
            content: content.into(),
            project: None,
        }
    }

    /// Create a message from raw text with no id; the orchestrator assigns one
    pub fn from_content(content: impl Into<String>) -> Self {
        Self::new("", content)
    }

    /// Set the message source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the sender
    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = sender;
        self
    }

    /// Set the project
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }
}
