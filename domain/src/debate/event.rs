//! Outbound debate events

use super::phase::DebatePhase;
use super::transcript::TranscriptEntry;
use serde::{Deserialize, Serialize};

/// An ordered, immutable event describing one transcript append.
///
/// Serialized as `{sequence, phase, round, type, payload}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateEvent {
    pub sequence: u64,
    /// Phase the entry belongs to (the target phase for phase changes)
    pub phase: DebatePhase,
    pub round: i32,
    #[serde(flatten)]
    pub entry: TranscriptEntry,
}

impl DebateEvent {
    pub fn type_name(&self) -> &'static str {
        self.entry.type_name()
    }

    pub fn is_terminal(&self) -> bool {
        self.entry.is_terminal()
    }
}
