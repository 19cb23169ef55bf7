use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue, json};

use crate::models::Value;

/// One content item within a message: plain text, a tool invocation, a tool
/// result, or an unrecognized shape kept under its raw type tag.
///
/// Decoding is manual rather than derived because the catch-all variant must
/// preserve the original tag string. Absent fields stay `None` so that callers
/// can tell "field omitted" from "field present but empty".
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text {
        text: Option<String>,
    },
    ToolUse {
        id: Option<String>,
        name: Option<String>,
        input: Option<BTreeMap<String, Value>>,
    },
    ToolResult {
        tool_use_id: Option<String>,
        content: Option<String>,
    },
    Other {
        block_type: String,
    },
}

impl ContentBlock {
    /// Synthetic text block, used to normalize bare-string message content.
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: Some(text.into()) }
    }

    /// Decode a content block from its JSON object form.
    ///
    /// Returns `None` when the value is not an object or carries no string
    /// `type` tag; any recognized tag with missing optional fields still
    /// decodes.
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        let obj = json.as_object()?;
        let block_type = obj.get("type")?.as_str()?;

        let block = match block_type {
            "text" => ContentBlock::Text { text: get_string(obj, "text") },
            "tool_use" => ContentBlock::ToolUse {
                id: get_string(obj, "id"),
                name: get_string(obj, "name"),
                input: obj.get("input").and_then(JsonValue::as_object).map(|map| {
                    map.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect()
                }),
            },
            "tool_result" => ContentBlock::ToolResult {
                tool_use_id: get_string(obj, "tool_use_id"),
                content: obj.get("content").and_then(result_text),
            },
            other => ContentBlock::Other { block_type: other.to_string() },
        };
        Some(block)
    }

    /// Encode back to the JSON object form, emitting only the fields that are
    /// present. Structural inverse of [`ContentBlock::from_json`] for blocks
    /// whose result content was already plain text.
    pub fn to_json(&self) -> JsonValue {
        let mut obj = Map::new();
        match self {
            ContentBlock::Text { text } => {
                obj.insert("type".into(), json!("text"));
                if let Some(text) = text {
                    obj.insert("text".into(), json!(text));
                }
            }
            ContentBlock::ToolUse { id, name, input } => {
                obj.insert("type".into(), json!("tool_use"));
                if let Some(id) = id {
                    obj.insert("id".into(), json!(id));
                }
                if let Some(name) = name {
                    obj.insert("name".into(), json!(name));
                }
                if let Some(input) = input {
                    let encoded: Map<String, JsonValue> =
                        input.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                    obj.insert("input".into(), JsonValue::Object(encoded));
                }
            }
            ContentBlock::ToolResult { tool_use_id, content } => {
                obj.insert("type".into(), json!("tool_result"));
                if let Some(tool_use_id) = tool_use_id {
                    obj.insert("tool_use_id".into(), json!(tool_use_id));
                }
                if let Some(content) = content {
                    obj.insert("content".into(), json!(content));
                }
            }
            ContentBlock::Other { block_type } => {
                obj.insert("type".into(), json!(block_type));
            }
        }
        JsonValue::Object(obj)
    }

    /// The raw type tag for this block.
    pub fn block_type(&self) -> &str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::ToolUse { .. } => "tool_use",
            ContentBlock::ToolResult { .. } => "tool_result",
            ContentBlock::Other { block_type } => block_type,
        }
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self, ContentBlock::ToolResult { .. })
    }

    /// Text carried by this block, if it is a text block with text present.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => text.as_deref(),
            _ => None,
        }
    }

    /// Display-stringified value of one tool-use input parameter, or `None`
    /// when this is not a tool use, the input map is absent, or the key is
    /// missing.
    pub fn input_display(&self, key: &str) -> Option<String> {
        match self {
            ContentBlock::ToolUse { input: Some(input), .. } => {
                input.get(key).map(Value::to_display_string)
            }
            _ => None,
        }
    }
}

fn get_string(obj: &Map<String, JsonValue>, key: &str) -> Option<String> {
    obj.get(key).and_then(JsonValue::as_str).map(str::to_owned)
}

/// Tool results carry either plain text or a nested content sequence; the
/// nested form is flattened to its newline-joined text for storage.
fn result_text(content: &JsonValue) -> Option<String> {
    match content {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|item| {
                    let obj = item.as_object()?;
                    if obj.get("type").and_then(JsonValue::as_str) == Some("text") {
                        obj.get("text").and_then(JsonValue::as_str)
                    } else {
                        None
                    }
                })
                .collect();
            Some(parts.join("\n"))
        }
        _ => None,
    }
}
