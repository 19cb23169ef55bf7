use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use crate::models::{ContentBlock, TokenUsage};

/// One raw transcript line, decoded into its typed wire shape.
///
/// Only `sessionId` and a parseable `timestamp` are structurally required;
/// everything else is optional because transcripts interleave several record
/// shapes on the same stream. A line that fails to decode into this struct is
/// skipped by the line-stream parser, never fatal for the batch.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(
        rename = "sessionId",
        deserialize_with = "crate::parsers::deserializers::deserialize_session_id"
    )]
    pub session_id: String,
    /// Line-level type tag, e.g. "user" or "assistant"
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
    /// Records without a uuid (queue/control operations) carry no identity
    /// and are excluded from the message set downstream
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(rename = "parentUuid", default)]
    pub parent_uuid: Option<String>,
    #[serde(rename = "isSidechain", default)]
    pub is_sidechain: Option<bool>,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message: Option<RawMessage>,
}

/// The nested `message` object of a transcript line.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: RawContent,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
    /// Read but not persisted
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Message content is polymorphic on the wire: absent, a bare string, or an
/// array of content blocks. Consumers match exhaustively over the three.
#[derive(Debug, Clone, Default)]
pub enum RawContent {
    #[default]
    Absent,
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl RawContent {
    /// Normalize to a block sequence: a bare string becomes one synthetic
    /// text block, absent content becomes no blocks.
    pub fn into_blocks(self) -> Vec<ContentBlock> {
        match self {
            RawContent::Absent => Vec::new(),
            RawContent::Text(text) => vec![ContentBlock::text(text)],
            RawContent::Blocks(blocks) => blocks,
        }
    }
}

fn deserialize_content<'de, D>(deserializer: D) -> Result<RawContent, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::String(s) => RawContent::Text(s),
        JsonValue::Array(items) => {
            RawContent::Blocks(items.iter().filter_map(ContentBlock::from_json).collect())
        }
        // null or any unexpected shape degrades to absent
        _ => RawContent::Absent,
    })
}
