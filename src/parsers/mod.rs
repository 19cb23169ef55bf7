//! JSONL transcript decoding and classification
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach:
//!
//! - **Individual line failures**: Malformed lines are logged via `tracing` and
//!   skipped, allowing parsing to continue. A single bad line never aborts the
//!   batch, and neither does a record without a uuid (silently dropped, it has
//!   no identity to import under).
//!
//! - **Fatal failures**: Only the absence of any structurally valid line is
//!   fatal, because without one there is no session identifier and no
//!   conversation to create. That surfaces as [`crate::Error::InvalidTranscript`].
//!
//! - **Observability**: Skipped-line counts are reported on the parse result
//!   and logged, so malformed transcripts stay debuggable without surfacing
//!   per-line noise to the end user.

pub mod deserializers;
pub mod record;
pub mod transcript;

pub use record::{RawContent, RawMessage, RawRecord};
pub use transcript::{ParsedMessage, ParsedTranscript, parse_transcript, parse_transcript_file};
