//! Conversation assembly: parse a transcript, then either return the
//! conversation that already exists for its session identifier or create a
//! new one with all of its messages attached.
//!
//! Re-import of a transcript under a known session identifier is a strict
//! no-op on the existing conversation: no merging, no new-message detection,
//! no title or file-path update.

use std::path::Path;

use crate::error::Result;
use crate::models::{Conversation, MessageKind};
use crate::parsers::{ParsedTranscript, parse_transcript};
use crate::store::ConversationStore;
use crate::titles::TitleGenerator;
use crate::utils::read_transcript_text;

/// Import a transcript file into the store.
///
/// # Errors
///
/// [`crate::Error::FileUnreadable`] when the file cannot be read,
/// [`crate::Error::InvalidTranscript`] when no line carries a session
/// identifier, and [`crate::Error::Storage`] when the batch cannot be
/// committed. A storage failure leaves no partial conversation behind.
pub fn import_transcript(path: &Path, store: &dyn ConversationStore) -> Result<Conversation> {
    let text = read_transcript_text(path)?;
    import_transcript_text(&text, Some(path), store)
}

/// Import already-read transcript text, with an optional originating file
/// path recorded on the conversation (informational only).
pub fn import_transcript_text(
    text: &str,
    file_path: Option<&Path>,
    store: &dyn ConversationStore,
) -> Result<Conversation> {
    let parsed = parse_transcript(text)?;
    assemble(parsed, file_path, store)
}

/// Import a transcript file and, only when this import actually created the
/// conversation, try to give it a better title than the session identifier.
///
/// Title generation is best-effort: a generator returning `None`, an empty
/// title, or a failing rename all silently leave the default title. None of
/// them fail the import.
pub fn import_transcript_with_title(
    path: &Path,
    store: &dyn ConversationStore,
    titles: &dyn TitleGenerator,
) -> Result<Conversation> {
    let text = read_transcript_text(path)?;
    let parsed = parse_transcript(&text)?;

    if let Some(existing) = store.find_conversation(&parsed.session_id)? {
        tracing::debug!(session_id = %parsed.session_id, "transcript already imported");
        return Ok(existing);
    }

    let seed = parsed
        .messages
        .iter()
        .find(|m| m.kind == MessageKind::User)
        .map(|m| m.plain_text());
    let conversation =
        store.create_conversation_with_messages(&parsed.session_id, Some(path), &parsed.messages)?;

    if let Some(seed) = seed.filter(|s| !s.is_empty())
        && let Some(title) = titles.generate(&seed)
        && !title.trim().is_empty()
    {
        let title = title.trim().to_string();
        match store.rename_conversation(conversation.id, &title) {
            Ok(()) => return Ok(Conversation { title, ..conversation }),
            Err(e) => {
                tracing::warn!(session_id = %conversation.session_id, error = %e,
                    "title generation succeeded but rename failed, keeping default title");
            }
        }
    }
    Ok(conversation)
}

fn assemble(
    parsed: ParsedTranscript,
    file_path: Option<&Path>,
    store: &dyn ConversationStore,
) -> Result<Conversation> {
    if let Some(existing) = store.find_conversation(&parsed.session_id)? {
        tracing::debug!(session_id = %parsed.session_id, "transcript already imported");
        return Ok(existing);
    }
    store.create_conversation_with_messages(&parsed.session_id, file_path, &parsed.messages)
}
