use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};

use crate::error::Result;
use crate::models::{Conversation, MessageKind, Role, StoredMessage, TokenUsage};
use crate::parsers::ParsedMessage;
use crate::store::ConversationStore;

/// Core schema. Timestamps are stored as integer milliseconds since epoch;
/// content blocks as one opaque JSON blob per message. Message uuids are
/// deliberately not UNIQUE: replayed transcripts may repeat them and the
/// pipeline only deduplicates at conversation granularity.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    file_path TEXT,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
    uuid TEXT NOT NULL,
    parent_uuid TEXT,
    kind TEXT NOT NULL,
    role TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    model TEXT,
    is_sidechain INTEGER NOT NULL DEFAULT 0,
    content TEXT NOT NULL,
    input_tokens INTEGER,
    output_tokens INTEGER,
    cache_creation_input_tokens INTEGER,
    cache_read_input_tokens INTEGER
);

CREATE INDEX IF NOT EXISTS idx_conversations_session ON conversations(session_id);
CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id);
CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp);
"#;

const CONVERSATION_COLUMNS: &str = "c.id, c.session_id, c.title, c.file_path, c.created_at, \
     (SELECT COUNT(*) FROM messages m WHERE m.conversation_id = c.id)";

const MESSAGE_COLUMNS: &str = "id, uuid, parent_uuid, kind, role, timestamp, model, \
     is_sidechain, content, input_tokens, output_tokens, \
     cache_creation_input_tokens, cache_read_input_tokens";

/// SQLite-backed conversation store.
///
/// The UNIQUE constraint on `session_id` is what serializes concurrent
/// imports of the same transcript: the loser of the race observes the
/// conflict inside its transaction and falls back to the winner's row.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (creating if needed) a store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| crate::Error::FileUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA_SQL)?;
        tracing::debug!("conversation store ready");
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    fn conversation_from_row(row: &Row<'_>) -> rusqlite::Result<Conversation> {
        Ok(Conversation {
            id: row.get(0)?,
            session_id: row.get(1)?,
            title: row.get(2)?,
            file_path: row.get(3)?,
            created_at: timestamp_from_ms(row.get(4)?, 4)?,
            message_count: row.get(5)?,
        })
    }

    fn message_from_row(row: &Row<'_>) -> rusqlite::Result<StoredMessage> {
        let kind: String = row.get(3)?;
        let role: String = row.get(4)?;
        let usage = TokenUsage {
            input_tokens: row.get(9)?,
            output_tokens: row.get(10)?,
            cache_creation_input_tokens: row.get(11)?,
            cache_read_input_tokens: row.get(12)?,
        };
        Ok(StoredMessage {
            id: row.get(0)?,
            uuid: row.get(1)?,
            parent_uuid: row.get(2)?,
            kind: MessageKind::parse(&kind).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    Type::Text,
                    format!("unknown message kind: {kind}").into(),
                )
            })?,
            role: Role::parse(&role).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    Type::Text,
                    format!("unknown role: {role}").into(),
                )
            })?,
            timestamp: timestamp_from_ms(row.get(5)?, 5)?,
            model: row.get(6)?,
            usage: if usage.is_empty() { None } else { Some(usage) },
            is_sidechain: row.get(7)?,
            content_json: row.get(8)?,
        })
    }
}

fn timestamp_from_ms(ms: i64, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Integer,
            format!("timestamp out of range: {ms}").into(),
        )
    })
}

impl ConversationStore for SqliteStore {
    fn find_conversation(&self, session_id: &str) -> Result<Option<Conversation>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations c WHERE c.session_id = ?1"
        );
        conn.query_row(&sql, params![session_id], Self::conversation_from_row)
            .optional()
            .map_err(Into::into)
    }

    fn create_conversation_with_messages(
        &self,
        session_id: &str,
        file_path: Option<&Path>,
        messages: &[ParsedMessage],
    ) -> Result<Conversation> {
        // Encode content outside the transaction; a serialization failure
        // must not leave a half-written conversation behind
        let mut blobs = Vec::with_capacity(messages.len());
        for message in messages {
            blobs.push(message.content_json()?);
        }

        let file_path = file_path.map(|p| p.to_string_lossy().into_owned());
        let now = Utc::now();

        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let inserted = tx.execute(
            "INSERT INTO conversations (session_id, title, file_path, created_at) \
             VALUES (?1, ?2, ?3, ?4) ON CONFLICT(session_id) DO NOTHING",
            params![session_id, session_id, file_path, now.timestamp_millis()],
        )?;

        if inserted == 0 {
            // Lost the race: a concurrent import created this session first.
            // Fall back to the winner's row, untouched.
            let sql = format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations c WHERE c.session_id = ?1"
            );
            let existing = tx.query_row(&sql, params![session_id], Self::conversation_from_row)?;
            tx.commit()?;
            tracing::debug!(session_id, "conversation already existed, returning it");
            return Ok(existing);
        }

        let conversation_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO messages (conversation_id, uuid, parent_uuid, kind, role, \
                 timestamp, model, is_sidechain, content, input_tokens, output_tokens, \
                 cache_creation_input_tokens, cache_read_input_tokens) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for (message, blob) in messages.iter().zip(&blobs) {
                let usage = message.usage.as_ref();
                stmt.execute(params![
                    conversation_id,
                    message.uuid,
                    message.parent_uuid,
                    message.kind.as_str(),
                    message.role.as_str(),
                    message.timestamp.timestamp_millis(),
                    message.model,
                    message.is_sidechain,
                    blob,
                    usage.and_then(|u| u.input_tokens),
                    usage.and_then(|u| u.output_tokens),
                    usage.and_then(|u| u.cache_creation_input_tokens),
                    usage.and_then(|u| u.cache_read_input_tokens),
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!(
            session_id,
            messages = messages.len(),
            "imported conversation"
        );

        Ok(Conversation {
            id: conversation_id,
            session_id: session_id.to_string(),
            title: session_id.to_string(),
            file_path,
            created_at: now,
            message_count: messages.len() as i64,
        })
    }

    fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations c ORDER BY c.created_at DESC, c.id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::conversation_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn conversation_messages(&self, conversation_id: i64) -> Result<Vec<StoredMessage>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE conversation_id = ?1 \
             ORDER BY timestamp ASC, id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![conversation_id], Self::message_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn rename_conversation(&self, conversation_id: i64, title: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE conversations SET title = ?1 WHERE id = ?2",
            params![title, conversation_id],
        )?;
        Ok(())
    }

    fn delete_conversation(&self, conversation_id: i64) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM conversations WHERE id = ?1", params![conversation_id])?;
        Ok(())
    }
}
