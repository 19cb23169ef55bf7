//! Library error type for the import pipeline.
//!
//! Per-line problems (malformed JSON, missing uuid, bad timestamp) are never
//! errors: the parser recovers locally, logs, and keeps going. This enum only
//! covers the fatal cases a caller has to act on, with messages that
//! distinguish "file unreadable" from "not a valid transcript" from
//! "could not be saved".

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The transcript file could not be opened or read.
    #[error("cannot read transcript file {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No line in the file decoded as a transcript record, so there is no
    /// session identifier and nothing to import.
    #[error("not a valid transcript: no line carries a session identifier")]
    InvalidTranscript,

    /// The conversation could not be saved to the store.
    #[error("conversation could not be saved: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Content blocks could not be encoded for storage.
    #[error("failed to encode message content: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
