//! Wire types for the Assistants v2 API.
//!
//! Only the fields this program actually reads are modeled. Everything else
//! in the service's responses is ignored, and unrecognized content-block
//! kinds deserialize into a catch-all variant instead of failing the parse.

use serde::{Deserialize, Serialize};

/// Request body for registering the assistant persona.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAssistantRequest {
    pub name: String,
    pub instructions: String,
    pub model: String,
}

/// An assistant resource held by the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct Assistant {
    pub id: String,
}

/// A conversation thread held by the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Request body for appending a message to a thread.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest {
    pub role: Role,
    pub content: String,
}

/// Author of a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message on a thread, as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl ThreadMessage {
    /// Returns the first textual content block, if the message carries one.
    /// Image blocks and unrecognized kinds are treated as absent.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.value.as_str()),
            _ => None,
        })
    }
}

/// Message content is a tagged union over block kinds; only the `text`
/// variant carries a displayable reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: TextContent },
    ImageFile,
    ImageUrl,
    #[serde(other)]
    Unknown,
}

/// Payload of a `text` content block. Annotations are not used here.
#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// Request body for starting a run of an assistant over a thread.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRunRequest {
    pub assistant_id: String,
}

/// One unit of remote processing of a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
}

/// Lifecycle status of a run. Only `Completed` yields a usable reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Incomplete,
    Expired,
}

impl RunStatus {
    /// True once the service will not advance the run any further on its
    /// own. `RequiresAction` counts as terminal because nothing here submits
    /// tool outputs.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Queued | Self::InProgress | Self::Cancelling)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Incomplete => "incomplete",
            Self::Expired => "expired",
        }
    }
}

/// Envelope returned by the message list endpoint, newest message first.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
}

/// Error envelope attached to non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}
