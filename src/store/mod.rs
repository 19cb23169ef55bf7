//! Persistence boundary for imported conversations.
//!
//! The import pipeline only needs a narrow contract from its store: look up a
//! conversation by its natural key, and create one together with its messages
//! in a single atomic commit. The trait also carries the read and maintenance
//! operations the presentation side consumes (listing, message retrieval,
//! rename, cascade delete), so a store implementation is a complete
//! collaborator.

pub mod sqlite;

use std::path::Path;

use crate::error::Result;
use crate::models::{Conversation, StoredMessage};
use crate::parsers::ParsedMessage;

pub use sqlite::SqliteStore;

pub trait ConversationStore {
    /// Look up a conversation by session identifier.
    fn find_conversation(&self, session_id: &str) -> Result<Option<Conversation>>;

    /// Create a conversation and attach all of its messages in one atomic
    /// commit: either everything becomes durably visible or nothing does.
    ///
    /// Creation serializes on the session identifier. When a concurrent
    /// import created the conversation first, the existing one is returned
    /// unchanged and no messages are inserted.
    fn create_conversation_with_messages(
        &self,
        session_id: &str,
        file_path: Option<&Path>,
        messages: &[ParsedMessage],
    ) -> Result<Conversation>;

    /// All conversations, newest first.
    fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Messages of one conversation in chronological order.
    fn conversation_messages(&self, conversation_id: i64) -> Result<Vec<StoredMessage>>;

    /// Change a conversation's display title.
    fn rename_conversation(&self, conversation_id: i64, title: &str) -> Result<()>;

    /// Delete a conversation and, cascading, all of its messages.
    fn delete_conversation(&self, conversation_id: i64) -> Result<()>;
}
