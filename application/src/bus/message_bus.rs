//! Message Bus / Turn Router
//!
//! The single serialization point of a session. Every append (message, tool
//! call, failure marker, phase change) takes the lock once: the sequence
//! number is allocated, the entry is appended to the transcript and handed
//! to the emitter before the lock is released, so transcript order and
//! stream order are the same thing.

use super::event_emitter::EventEmitter;
use super::event_stream::EventStream;
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptLogger};
use debate_domain::{
    AgentId, DebateEvent, DebatePhase, DebateRoster, DebateSession, DomainError, SessionId,
    ToolOutcome, Topic, TurnStatus,
};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::debug;

struct BusState {
    session: DebateSession,
    emitter: EventEmitter,
    /// Someone has subscribed at least once
    observed: bool,
}

pub struct MessageBus {
    state: Mutex<BusState>,
    logger: Arc<dyn TranscriptLogger>,
}

impl MessageBus {
    pub fn new(session: DebateSession) -> Self {
        Self {
            state: Mutex::new(BusState {
                session,
                emitter: EventEmitter::new(),
                observed: false,
            }),
            logger: Arc::new(NoTranscriptLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.logger = logger;
        self
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn commit<F>(&self, append: F) -> Result<DebateEvent, DomainError>
    where
        F: FnOnce(&mut DebateSession) -> Result<&DebateEvent, DomainError>,
    {
        let mut state = self.lock();
        let event = append(&mut state.session)?.clone();
        debug!(
            "#{} {} ({}, round {})",
            event.sequence,
            event.type_name(),
            event.phase.label(),
            event.round
        );
        state.emitter.emit(event.clone());
        self.logger.log(&event);
        Ok(event)
    }

    // ==================== Publishing ====================

    /// Publish a turn's content. Kind and recipients are derived from the
    /// phase and the roster.
    pub fn publish_message(
        &self,
        turn_phase: DebatePhase,
        sender: AgentId,
        content: String,
        status: Option<TurnStatus>,
    ) -> Result<DebateEvent, DomainError> {
        self.commit(|s| s.record_message(turn_phase, sender, content, status))
    }

    pub fn publish_tool_call(
        &self,
        turn_phase: DebatePhase,
        agent: AgentId,
        capability: String,
        arguments: Value,
        outcome: ToolOutcome,
    ) -> Result<DebateEvent, DomainError> {
        self.commit(|s| s.record_tool_call(turn_phase, agent, capability, arguments, outcome))
    }

    pub fn publish_failure(
        &self,
        turn_phase: DebatePhase,
        agent: AgentId,
        error: String,
    ) -> Result<DebateEvent, DomainError> {
        self.commit(|s| s.record_failure(turn_phase, agent, error))
    }

    pub fn transition(&self, to: DebatePhase) -> Result<DebateEvent, DomainError> {
        self.commit(|s| s.transition(to))
    }

    /// Enter round `round` unless the session is already there or past it.
    ///
    /// Used when debaters advance independently: the first one to reach a
    /// round moves the session into it.
    pub fn advance_to_round(&self, round: u32) -> Result<Option<DebateEvent>, DomainError> {
        let mut state = self.lock();
        let current = state.session.phase();
        let behind = match current {
            DebatePhase::Idle | DebatePhase::Planning => true,
            DebatePhase::Round(i) => i < round,
            _ => false,
        };
        if !behind {
            return Ok(None);
        }
        let event = state
            .session
            .transition(DebatePhase::Round(round))?
            .clone();
        state.emitter.emit(event.clone());
        self.logger.log(&event);
        Ok(Some(event))
    }

    /// End the session in `Failed` unless it already ended.
    pub fn fail(&self) -> Option<DebateEvent> {
        let mut state = self.lock();
        let event = state.session.fail()?.clone();
        state.emitter.emit(event.clone());
        self.logger.log(&event);
        Some(event)
    }

    // ==================== Observation ====================

    /// Attach the (single) subscriber. Replay and live attachment happen
    /// under one lock, so no event is missed or duplicated.
    pub fn subscribe(&self) -> EventStream {
        let mut state = self.lock();
        let (tx, rx) = mpsc::unbounded_channel();
        let replay = state.session.transcript().to_vec();
        state.observed = true;
        if !state.session.is_finished() {
            state.emitter.attach(tx);
        }
        EventStream::new(replay, rx)
    }

    pub fn has_subscriber(&self) -> bool {
        self.lock().emitter.has_subscriber()
    }

    /// A subscriber was attached and has since gone away.
    pub fn observer_detached(&self) -> bool {
        let state = self.lock();
        state.observed && !state.emitter.has_subscriber()
    }

    /// Transcript as of now.
    pub fn snapshot(&self) -> Arc<Vec<DebateEvent>> {
        Arc::new(self.lock().session.transcript().to_vec())
    }

    pub fn phase(&self) -> DebatePhase {
        self.lock().session.phase()
    }

    pub fn round(&self) -> i32 {
        self.lock().session.round()
    }

    pub fn is_finished(&self) -> bool {
        self.lock().session.is_finished()
    }

    pub fn session_id(&self) -> SessionId {
        self.lock().session.id().clone()
    }

    pub fn topic(&self) -> Topic {
        self.lock().session.topic().clone()
    }

    pub fn roster(&self) -> DebateRoster {
        self.lock().session.roster().clone()
    }

    pub fn round_count(&self) -> u32 {
        self.lock().session.round_count()
    }

    /// Read access to the session under the bus lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&DebateSession) -> R) -> R {
        f(&self.lock().session)
    }
}
