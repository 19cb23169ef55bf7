//! Session Importer - Convert Claude Code transcripts into a queryable store
//!
//! This library implements the conversation-log import pipeline: it takes a
//! line-delimited JSON transcript (one heterogeneous record per line), decodes
//! every line independently, classifies records into message kinds, and lands
//! the result in a deduplicated, durable conversation store. It supports:
//!
//! - Lenient decoding of polymorphic content blocks (text, tool invocations,
//!   tool results, arbitrary-shaped tool parameters)
//! - Per-line error recovery: malformed lines are skipped, never fatal
//! - Idempotent re-import keyed on the transcript's session identifier
//! - A SQLite-backed store with atomic conversation-plus-messages commits
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use session_importer::{SqliteStore, import_transcript};
//!
//! let store = SqliteStore::open(Path::new("conversations.db3"))?;
//! let conversation = import_transcript(Path::new("session.jsonl"), &store)?;
//! println!("{}: {} messages", conversation.session_id, conversation.message_count);
//! # Ok::<(), session_importer::Error>(())
//! ```

pub mod cli;
pub mod error;
pub mod importer;
pub mod models;
pub mod parsers;
pub mod store;
pub mod titles;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use importer::{import_transcript, import_transcript_text, import_transcript_with_title};
pub use models::{
    ContentBlock, Conversation, MessageKind, Role, StoredMessage, TokenUsage, Value,
};
pub use parsers::{ParsedMessage, ParsedTranscript, parse_transcript, parse_transcript_file};
pub use store::{ConversationStore, SqliteStore};
pub use titles::{FirstLineTitles, NoTitles, TitleGenerator};
