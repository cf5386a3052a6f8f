//! Port for persisting the event stream of a session.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the transcript in a
//! machine-readable format (e.g. JSONL).

use debate_domain::{DebateEvent, SessionId};
use std::sync::Arc;

/// Records the events of one session.
///
/// `log` is synchronous and non-fallible; implementations swallow their own
/// I/O failures so the debate is never disrupted by logging.
pub trait TranscriptLogger: Send + Sync {
    fn log(&self, event: &DebateEvent);
}

/// Opens a [`TranscriptLogger`] for each new session.
pub trait TranscriptStore: Send + Sync {
    fn open(&self, session: &SessionId) -> Arc<dyn TranscriptLogger>;
}

/// No-op implementation for tests and when persistence is disabled.
pub struct NoTranscriptLogger;

impl TranscriptLogger for NoTranscriptLogger {
    fn log(&self, _event: &DebateEvent) {}
}

impl TranscriptStore for NoTranscriptLogger {
    fn open(&self, _session: &SessionId) -> Arc<dyn TranscriptLogger> {
        Arc::new(NoTranscriptLogger)
    }
}
