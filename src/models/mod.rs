//! Data models for imported conversation transcripts.
//!
//! This module defines the data structures used throughout the pipeline:
//!
//! - [`Value`] - arbitrary JSON values inside tool-use parameters
//! - [`ContentBlock`] - one content item within a message
//! - [`Conversation`] / [`StoredMessage`] - the durable shapes read back from a store
//! - [`MessageKind`] / [`Role`] / [`TokenUsage`] - classification and usage axes
//!
//! Wire-shape structs live in the `parsers` module; these are the normalized
//! in-memory forms the rest of the crate works with.

pub mod content;
pub mod conversation;
pub mod value;

pub use content::ContentBlock;
pub use conversation::{Conversation, MessageKind, Role, StoredMessage, TokenUsage};
pub use value::Value;
