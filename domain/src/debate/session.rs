//! DebateSession aggregate root
//!
//! The session owns the phase, the current round index, the transcript and
//! the single sequence counter. Every mutation goes through one of the
//! `record_*` / `transition` methods, each of which appends exactly one
//! [`DebateEvent`] and consumes exactly one sequence number.

use super::event::DebateEvent;
use super::message::{DebateMessage, TurnStatus};
use super::phase::{DebatePhase, PhasePlan};
use super::roster::DebateRoster;
use super::routing::recipients_for;
use super::transcript::{PhaseChange, ToolCallRecord, TranscriptEntry, TurnFailure};
use crate::core::agent::{AgentId, AgentRole};
use crate::core::error::{ConfigurationError, DomainError};
use crate::core::session_id::SessionId;
use crate::core::topic::Topic;
use crate::tool::value_objects::ToolOutcome;
use chrono::Utc;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct DebateSession {
    id: SessionId,
    topic: Topic,
    roster: DebateRoster,
    plan: PhasePlan,
    phase: DebatePhase,
    /// 0 before the first phase starts
    round: i32,
    transcript: Vec<DebateEvent>,
    next_sequence: u64,
}

impl DebateSession {
    pub fn new(
        id: SessionId,
        topic: Topic,
        roster: DebateRoster,
        round_count: u32,
    ) -> Result<Self, ConfigurationError> {
        if round_count == 0 {
            return Err(ConfigurationError::InvalidRoundCount);
        }
        let plan = roster.phase_plan(round_count);
        Ok(Self {
            id,
            topic,
            roster,
            plan,
            phase: DebatePhase::Idle,
            round: 0,
            transcript: Vec::new(),
            next_sequence: 0,
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn roster(&self) -> &DebateRoster {
        &self.roster
    }

    pub fn plan(&self) -> &PhasePlan {
        &self.plan
    }

    pub fn round_count(&self) -> u32 {
        self.plan.round_count
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    pub fn round(&self) -> i32 {
        self.round
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn transcript(&self) -> &[DebateEvent] {
        &self.transcript
    }

    /// Sequence number the next entry will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn messages(&self) -> impl Iterator<Item = &DebateMessage> {
        self.transcript.iter().filter_map(|e| e.entry.as_message())
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallRecord> {
        self.transcript.iter().filter_map(|e| e.entry.as_tool_call())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TurnFailure> {
        self.transcript.iter().filter_map(|e| e.entry.as_failure())
    }

    /// Move to the next phase, appending a phase change entry.
    pub fn transition(&mut self, to: DebatePhase) -> Result<&DebateEvent, DomainError> {
        let from = self.phase;
        self.phase = from.transition(to, &self.plan)?;
        if let Some(round) = to.round_index(&self.plan) {
            self.round = round;
        }
        let round = self.round;
        let sequence = self.allocate_sequence();
        let entry = TranscriptEntry::PhaseChange(PhaseChange {
            sequence,
            from,
            to,
            timestamp: Utc::now(),
        });
        Ok(self.append(sequence, to, round, entry))
    }

    /// Move to `Failed` unless the session already ended.
    ///
    /// Returns the terminal event when one was appended.
    pub fn fail(&mut self) -> Option<&DebateEvent> {
        if self.phase.is_terminal() {
            return None;
        }
        self.transition(DebatePhase::Failed).ok()
    }

    /// Publish the content of a turn taken during `turn_phase`.
    ///
    /// Kind and recipients are derived from the phase; the sender must hold
    /// the role that speaks in it.
    pub fn record_message(
        &mut self,
        turn_phase: DebatePhase,
        sender: AgentId,
        content: String,
        status: Option<TurnStatus>,
    ) -> Result<&DebateEvent, DomainError> {
        let round = self.check_turn(turn_phase, &sender)?;
        let kind = turn_phase
            .message_kind()
            .ok_or_else(|| self.unexpected(&sender, turn_phase))?;
        let to = recipients_for(&turn_phase, &sender, &self.roster);
        let sequence = self.allocate_sequence();
        let entry = TranscriptEntry::Message(DebateMessage {
            sequence,
            sender,
            kind,
            content,
            to,
            round,
            status,
            timestamp: Utc::now(),
        });
        Ok(self.append(sequence, turn_phase, round, entry))
    }

    pub fn record_tool_call(
        &mut self,
        turn_phase: DebatePhase,
        agent: AgentId,
        capability: String,
        arguments: Value,
        outcome: ToolOutcome,
    ) -> Result<&DebateEvent, DomainError> {
        let round = self.check_turn(turn_phase, &agent)?;
        let sequence = self.allocate_sequence();
        let entry = TranscriptEntry::ToolCall(ToolCallRecord {
            sequence,
            agent,
            round,
            capability,
            arguments,
            outcome,
            timestamp: Utc::now(),
        });
        Ok(self.append(sequence, turn_phase, round, entry))
    }

    /// Record a failure marker in the slot the agent's message would occupy.
    pub fn record_failure(
        &mut self,
        turn_phase: DebatePhase,
        agent: AgentId,
        error: String,
    ) -> Result<&DebateEvent, DomainError> {
        let round = self.check_turn(turn_phase, &agent)?;
        let sequence = self.allocate_sequence();
        let entry = TranscriptEntry::TurnFailure(TurnFailure {
            sequence,
            agent,
            round,
            error,
            timestamp: Utc::now(),
        });
        Ok(self.append(sequence, turn_phase, round, entry))
    }

    fn check_turn(&self, turn_phase: DebatePhase, agent: &AgentId) -> Result<i32, DomainError> {
        if self.phase.is_terminal() {
            return Err(DomainError::SessionClosed(self.phase.label()));
        }
        let expected = match turn_phase {
            DebatePhase::Planning => AgentRole::Planner,
            DebatePhase::Round(i) if (1..=self.plan.round_count).contains(&i) => AgentRole::Debater,
            DebatePhase::Judgment => AgentRole::Judge,
            _ => return Err(self.unexpected(agent, turn_phase)),
        };
        if self.roster.role_of(agent) != Some(expected) {
            return Err(self.unexpected(agent, turn_phase));
        }
        turn_phase
            .round_index(&self.plan)
            .ok_or_else(|| self.unexpected(agent, turn_phase))
    }

    fn unexpected(&self, agent: &AgentId, phase: DebatePhase) -> DomainError {
        DomainError::UnexpectedSpeaker {
            agent: agent.to_string(),
            phase: phase.label(),
        }
    }

    fn allocate_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn append(
        &mut self,
        sequence: u64,
        phase: DebatePhase,
        round: i32,
        entry: TranscriptEntry,
    ) -> &DebateEvent {
        self.transcript.push(DebateEvent {
            sequence,
            phase,
            round,
            entry,
        });
        let last = self.transcript.len() - 1;
        &self.transcript[last]
    }
}
