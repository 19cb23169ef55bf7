//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Builder for transcript lines in the wire format
pub struct RecordBuilder {
    session_id: String,
    entry_type: Option<String>,
    uuid: Option<String>,
    parent_uuid: Option<String>,
    is_sidechain: Option<bool>,
    timestamp: String,
    message: Option<serde_json::Value>,
}

impl RecordBuilder {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            entry_type: None,
            uuid: None,
            parent_uuid: None,
            is_sidechain: None,
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            message: None,
        }
    }

    pub fn entry_type(mut self, entry_type: &str) -> Self {
        self.entry_type = Some(entry_type.to_string());
        self
    }

    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(uuid.to_string());
        self
    }

    pub fn parent_uuid(mut self, parent_uuid: &str) -> Self {
        self.parent_uuid = Some(parent_uuid.to_string());
        self
    }

    pub fn sidechain(mut self, is_sidechain: bool) -> Self {
        self.is_sidechain = Some(is_sidechain);
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = timestamp.to_string();
        self
    }

    pub fn message(mut self, message: serde_json::Value) -> Self {
        self.message = Some(message);
        self
    }

    pub fn user_text(self, uuid: &str, text: &str) -> Self {
        self.entry_type("user")
            .uuid(uuid)
            .message(serde_json::json!({"role": "user", "content": text}))
    }

    pub fn assistant_text(self, uuid: &str, text: &str) -> Self {
        self.entry_type("assistant").uuid(uuid).message(serde_json::json!({
            "role": "assistant",
            "model": "test-model",
            "content": [{"type": "text", "text": text}],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }))
    }

    pub fn to_json(&self) -> String {
        let mut obj = serde_json::Map::new();
        obj.insert("sessionId".into(), self.session_id.clone().into());
        if let Some(entry_type) = &self.entry_type {
            obj.insert("type".into(), entry_type.clone().into());
        }
        if let Some(uuid) = &self.uuid {
            obj.insert("uuid".into(), uuid.clone().into());
        }
        if let Some(parent_uuid) = &self.parent_uuid {
            obj.insert("parentUuid".into(), parent_uuid.clone().into());
        }
        if let Some(is_sidechain) = self.is_sidechain {
            obj.insert("isSidechain".into(), is_sidechain.into());
        }
        obj.insert("timestamp".into(), self.timestamp.clone().into());
        if let Some(message) = &self.message {
            obj.insert("message".into(), message.clone());
        }
        serde_json::Value::Object(obj).to_string()
    }
}

/// Builder for transcript files on disk
pub struct TranscriptBuilder {
    temp_dir: TempDir,
    lines: Vec<String>,
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, lines: Vec::new() }
    }

    pub fn record(mut self, record: RecordBuilder) -> Self {
        self.lines.push(record.to_json());
        self
    }

    pub fn raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Write the transcript to a file and return its path. The TempDir must
    /// stay alive for the path to remain valid.
    pub fn write(&self, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, self.lines.join("\n")).expect("Failed to write transcript");
        path
    }

    pub fn dir(&self) -> &TempDir {
        &self.temp_dir
    }
}
