//! Core types for conversations with remote agents

use serde::{Deserialize, Serialize};

/// A named agent persona exposed by the remote service.
///
/// Personas are defined once at process start by the registry and never
/// mutated. Visual metadata (icons, colors) is deliberately absent; that
/// belongs to the presentation layer's view-model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Opaque identifier sent with every request as `agent_id`
    pub id: String,
    /// Human-readable name, unique across the registry
    pub name: String,
    /// Short description for the selection UI
    pub description: String,
    /// Opening assistant message for a fresh conversation
    pub greeting: String,
}

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One immutable turn in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique within a session
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Creation time in unix milliseconds
    pub created_at: i64,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Request body for the agent endpoint
#[derive(Debug, Clone, Serialize)]
pub struct AgentRequest {
    pub message: String,
    pub agent_id: String,
}

/// Response body from the agent endpoint.
///
/// Every field is optional: the service evolves independently of this
/// client, and a well-formed reply may carry any subset. `status`,
/// `success`, `intent_detected`, and `metadata` are parsed and retained
/// but currently unused.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentReply {
    pub response: Option<String>,
    pub raw_response: Option<String>,
    pub status: Option<String>,
    pub success: Option<bool>,
    pub intent_detected: Option<String>,
    pub metadata: Option<ReplyMetadata>,
}

/// Auxiliary reply metadata, all optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplyMetadata {
    pub topic: Option<String>,
    pub sentiment: Option<String>,
    pub requires_followup: Option<bool>,
}

impl AgentReply {
    /// Extract the displayable reply text.
    ///
    /// Ordered fallback chain: `response` wins over `raw_response`; `None`
    /// means the reply carried no usable text and the caller must supply
    /// its fallback string.
    pub fn reply_text(&self) -> Option<&str> {
        self.response.as_deref().or(self.raw_response.as_deref())
    }
}
