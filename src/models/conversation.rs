use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ContentBlock;

/// Message kind, assigned by the classifier's ordered heuristics.
///
/// This is a finer axis than [`Role`]: tool results travel inside user-typed
/// envelopes on the wire but get their own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Assistant,
    System,
    ToolResult,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Assistant => "assistant",
            MessageKind::System => "system",
            MessageKind::ToolResult => "tool_result",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(MessageKind::User),
            "assistant" => Some(MessageKind::Assistant),
            "system" => Some(MessageKind::System),
            "tool_result" => Some(MessageKind::ToolResult),
            _ => None,
        }
    }
}

/// Coarse role axis kept alongside [`MessageKind`] for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "system" => Some(Role::System),
            _ => None,
        }
    }
}

/// Token counts reported on assistant records. Absent fields mean
/// "not reported", never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub cache_creation_input_tokens: Option<u64>,
    #[serde(default)]
    pub cache_read_input_tokens: Option<u64>,
}

impl TokenUsage {
    pub fn is_empty(&self) -> bool {
        self.input_tokens.is_none()
            && self.output_tokens.is_none()
            && self.cache_creation_input_tokens.is_none()
            && self.cache_read_input_tokens.is_none()
    }
}

/// A stored conversation: surrogate id plus the session identifier as its
/// natural key. At most one exists per session identifier in a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: i64,
    pub session_id: String,
    /// Defaults to the session identifier; user-renameable.
    pub title: String,
    /// Originating file path, informational only.
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub message_count: i64,
}

/// A message as read back from the store. Content blocks are kept as one
/// opaque encoded blob and decoded on demand.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub id: i64,
    pub uuid: String,
    pub parent_uuid: Option<String>,
    pub kind: MessageKind,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    pub model: Option<String>,
    pub usage: Option<TokenUsage>,
    pub is_sidechain: bool,
    pub(crate) content_json: String,
}

impl StoredMessage {
    /// Decode the content blob back into blocks. An unreadable blob decodes
    /// to no blocks rather than failing the read path.
    pub fn content_blocks(&self) -> Vec<ContentBlock> {
        let items: Vec<serde_json::Value> = match serde_json::from_str(&self.content_json) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(uuid = %self.uuid, error = %e, "unreadable content blob");
                return Vec::new();
            }
        };
        items.iter().filter_map(ContentBlock::from_json).collect()
    }

    /// Plain-text projection: all text-bearing block contents, newline-joined.
    /// Used for previews and title generation.
    pub fn plain_text(&self) -> String {
        let blocks = self.content_blocks();
        let parts: Vec<&str> = blocks.iter().filter_map(ContentBlock::text_content).collect();
        parts.join("\n")
    }
}
