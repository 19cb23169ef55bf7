use std::path::Path;

use rayon::prelude::*;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::models::{ContentBlock, MessageKind, Role, TokenUsage};
use crate::parsers::record::RawRecord;
use crate::utils::read_transcript_text;

/// One classified message, ready to be attached to a conversation.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    pub uuid: String,
    pub parent_uuid: Option<String>,
    pub kind: MessageKind,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    /// Kept only on assistant records
    pub model: Option<String>,
    pub usage: Option<TokenUsage>,
    pub is_sidechain: bool,
    pub content: Vec<ContentBlock>,
}

impl ParsedMessage {
    /// Plain-text projection: all text-bearing block contents, newline-joined.
    pub fn plain_text(&self) -> String {
        let parts: Vec<&str> =
            self.content.iter().filter_map(ContentBlock::text_content).collect();
        parts.join("\n")
    }

    /// Encode the content blocks as the opaque blob the store keeps.
    pub fn content_json(&self) -> serde_json::Result<String> {
        let encoded: Vec<serde_json::Value> =
            self.content.iter().map(ContentBlock::to_json).collect();
        serde_json::to_string(&encoded)
    }
}

/// The result of parsing one transcript file.
#[derive(Debug, Clone)]
pub struct ParsedTranscript {
    /// Taken from the first structurally valid line
    pub session_id: String,
    /// In source line order; re-sort by timestamp for chronological order
    pub messages: Vec<ParsedMessage>,
    /// Lines that failed to decode and were skipped
    pub skipped_lines: usize,
}

/// Parse the full text of a transcript: split on newlines, decode every
/// non-empty line independently, derive the session identifier, and classify
/// each record into a message kind.
///
/// Malformed lines are logged and skipped, never fatal. Structurally valid
/// records without a `uuid` are silently dropped: they carry no identity and
/// cannot become messages.
///
/// # Errors
///
/// Returns [`Error::InvalidTranscript`] when no line decodes structurally,
/// since there is then no session identifier and nothing to import.
pub fn parse_transcript(text: &str) -> Result<ParsedTranscript> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();

    // Each line decodes independently, so decode in parallel and reduce
    // sequentially to keep source order
    let decoded: Vec<Option<RawRecord>> = lines
        .par_iter()
        .map(|(line_num, line)| match serde_json::from_str::<RawRecord>(line) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(line = line_num + 1, error = %e, "skipping malformed transcript line");
                None
            }
        })
        .collect();

    let session_id = decoded
        .iter()
        .flatten()
        .next()
        .map(|record| record.session_id.clone())
        .ok_or(Error::InvalidTranscript)?;

    let skipped_lines = decoded.iter().filter(|record| record.is_none()).count();

    let mut messages = Vec::new();
    for record in decoded.into_iter().flatten() {
        let Some(uuid) = record.uuid else {
            tracing::debug!(
                entry_type = record.entry_type.as_deref().unwrap_or("<none>"),
                "dropping record without uuid"
            );
            continue;
        };

        let (role, content, model, usage) = match record.message {
            Some(message) => (message.role, message.content, message.model, message.usage),
            None => (None, Default::default(), None, None),
        };
        let content = content.into_blocks();
        let (kind, role) = classify(record.entry_type.as_deref(), role.as_deref(), &content);

        messages.push(ParsedMessage {
            uuid,
            parent_uuid: record.parent_uuid,
            kind,
            role,
            timestamp: record.timestamp,
            model: if kind == MessageKind::Assistant { model } else { None },
            usage,
            is_sidechain: record.is_sidechain.unwrap_or(false),
            content,
        });
    }

    if skipped_lines > 0 {
        tracing::warn!(
            session_id = %session_id,
            skipped = skipped_lines,
            parsed = messages.len(),
            "transcript parsed with skipped lines"
        );
    }

    Ok(ParsedTranscript { session_id, messages, skipped_lines })
}

/// Read and parse a transcript file.
///
/// # Errors
///
/// [`Error::FileUnreadable`] when the file cannot be read as text,
/// [`Error::InvalidTranscript`] when no line decodes structurally.
pub fn parse_transcript_file(path: &Path) -> Result<ParsedTranscript> {
    let text = read_transcript_text(path)?;
    parse_transcript(&text)
}

/// Classify one record into message kind and role, in fixed precedence order.
///
/// A tool result embedded in a user-typed envelope must classify as a tool
/// result, so the block scan runs before the type-tag checks. Assistant is
/// detected by either the line type or the nested role.
fn classify(
    entry_type: Option<&str>,
    role: Option<&str>,
    content: &[ContentBlock],
) -> (MessageKind, Role) {
    if content.iter().any(ContentBlock::is_tool_result) {
        // Tool output is attributed to the user/environment, not the model
        return (MessageKind::ToolResult, Role::User);
    }
    match entry_type {
        Some("user") => (MessageKind::User, Role::User),
        Some("assistant") => (MessageKind::Assistant, Role::Assistant),
        _ if role == Some("assistant") => (MessageKind::Assistant, Role::Assistant),
        _ => (MessageKind::System, Role::System),
    }
}
