//! Transcript entries
//!
//! Every entry consumes one session-wide sequence number: messages, tool
//! calls, phase changes and turn failures share a single counter, so the
//! transcript is gap-free and doubles as the replayable event log.

use super::message::DebateMessage;
use super::phase::DebatePhase;
use crate::core::agent::AgentId;
use crate::tool::value_objects::ToolOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool invocation attempt, interleaved with messages by sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub sequence: u64,
    pub agent: AgentId,
    pub round: i32,
    pub capability: String,
    pub arguments: Value,
    pub outcome: ToolOutcome,
    pub timestamp: DateTime<Utc>,
}

/// Marker recorded in place of a message when a turn fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnFailure {
    pub sequence: u64,
    pub agent: AgentId,
    pub round: i32,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub sequence: u64,
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub timestamp: DateTime<Utc>,
}

/// Anything appended to a session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum TranscriptEntry {
    Message(DebateMessage),
    ToolCall(ToolCallRecord),
    PhaseChange(PhaseChange),
    TurnFailure(TurnFailure),
}

impl TranscriptEntry {
    pub fn sequence(&self) -> u64 {
        match self {
            TranscriptEntry::Message(m) => m.sequence,
            TranscriptEntry::ToolCall(t) => t.sequence,
            TranscriptEntry::PhaseChange(p) => p.sequence,
            TranscriptEntry::TurnFailure(f) => f.sequence,
        }
    }

    /// Wire name of the entry type (`message`, `tool_call`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            TranscriptEntry::Message(_) => "message",
            TranscriptEntry::ToolCall(_) => "tool_call",
            TranscriptEntry::PhaseChange(_) => "phase_change",
            TranscriptEntry::TurnFailure(_) => "turn_failure",
        }
    }

    pub fn as_message(&self) -> Option<&DebateMessage> {
        match self {
            TranscriptEntry::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCallRecord> {
        match self {
            TranscriptEntry::ToolCall(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_failure(&self) -> Option<&TurnFailure> {
        match self {
            TranscriptEntry::TurnFailure(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_phase_change(&self) -> Option<&PhaseChange> {
        match self {
            TranscriptEntry::PhaseChange(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this entry ends the stream (`Completed` or `Failed`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TranscriptEntry::PhaseChange(p) if p.to.is_terminal())
    }
}
