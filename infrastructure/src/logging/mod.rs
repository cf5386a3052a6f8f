//! Transcript persistence.
//!
//! Provides [`JsonlTranscriptWriter`], a JSONL file writer that implements
//! the [`TranscriptLogger`](debate_application::TranscriptLogger) port, and
//! [`JsonlTranscriptStore`], which opens one file per session.

mod jsonl_transcript;

pub use jsonl_transcript::{JsonlTranscriptStore, JsonlTranscriptWriter};
