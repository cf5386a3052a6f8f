//! Debate message entity

use crate::core::agent::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a message contributes to the debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Planner output, sent to every debater before round 1
    Analysis,
    /// Round 1 debater turn
    Argument,
    /// Round > 1 debater turn
    Rebuttal,
    /// Judge verdict, addressed to nobody
    FinalConclusion,
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Analysis => "analysis",
            MessageKind::Argument => "argument",
            MessageKind::Rebuttal => "rebuttal",
            MessageKind::FinalConclusion => "final_conclusion",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status an adapter reports alongside its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    Complete,
    /// Content is meant to be read and acted upon (planner briefs)
    Reading,
}

impl TurnStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TurnStatus::Complete => "complete",
            TurnStatus::Reading => "reading",
        }
    }
}

/// One published message. Immutable once it has a sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateMessage {
    pub sequence: u64,
    pub sender: AgentId,
    pub kind: MessageKind,
    pub content: String,
    pub to: Vec<AgentId>,
    /// −1 for planning, 1..=R for rounds, R for judgment
    pub round: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TurnStatus>,
    pub timestamp: DateTime<Utc>,
}

impl DebateMessage {
    pub fn is_addressed_to(&self, agent: &AgentId) -> bool {
        self.to.contains(agent)
    }
}
