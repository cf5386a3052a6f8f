//! Debate service: the session registry behind the external surface.
//!
//! Starts sessions on behalf of callers, hands out event streams, and stops
//! or releases sessions by id. Each session runs its Phase Controller on its
//! own task. A finished session is dropped from memory once its subscriber
//! has detached; sessions nobody subscribed to stay until `release`.

use super::run_debate::{DebateSummary, RunDebateError, RunDebateUseCase};
use crate::bus::{EventStream, MessageBus};
use crate::config::DebateConfig;
use crate::ports::agent_adapter::AgentAdapter;
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::ports::tool_router::ToolRouter;
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptStore};
use debate_domain::{
    AgentId, ConfigurationError, DebateEvent, DebatePhase, DebateRoster, DebateSession, SessionId,
    Topic,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Identifies whoever starts sessions (one active session per caller).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters of a new session. Unset fields fall back to the service config.
#[derive(Debug, Clone, Default)]
pub struct StartRequest {
    pub topic: String,
    pub round_count: Option<u32>,
    pub participants: Option<Vec<AgentId>>,
    pub planner_enabled: Option<bool>,
    pub judge_enabled: Option<bool>,
}

impl StartRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Default::default()
        }
    }

    pub fn with_round_count(mut self, rounds: u32) -> Self {
        self.round_count = Some(rounds);
        self
    }

    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AgentId>,
    {
        self.participants = Some(participants.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_planner(mut self, enabled: bool) -> Self {
        self.planner_enabled = Some(enabled);
        self
    }

    pub fn with_judge(mut self, enabled: bool) -> Self {
        self.judge_enabled = Some(enabled);
        self
    }
}

/// What a session is about, for announcing it before its events.
#[derive(Debug, Clone)]
pub struct SessionOverview {
    pub id: SessionId,
    pub topic: Topic,
    pub roster: DebateRoster,
    pub round_count: u32,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unknown session: {0}")]
    NotFound(SessionId),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Caller {caller} already has an active session ({session})")]
    SessionActive { caller: CallerId, session: SessionId },

    #[error("Session {0} has already been awaited")]
    AlreadyAwaited(SessionId),

    #[error(transparent)]
    Run(#[from] RunDebateError),

    #[error("Debate task ended unexpectedly: {0}")]
    TaskFailed(String),
}

struct SessionHandle {
    caller: CallerId,
    bus: Arc<MessageBus>,
    cancel: CancellationToken,
    task: Option<SessionTask>,
}

type SessionTask = JoinHandle<Result<DebateSummary, RunDebateError>>;

#[derive(Default)]
struct Registry {
    sessions: HashMap<SessionId, SessionHandle>,
    active: HashMap<CallerId, SessionId>,
    /// Controllers of collected sessions that have not been awaited yet
    unclaimed: HashMap<SessionId, SessionTask>,
}

impl Registry {
    /// Forget finished sessions whose subscriber has detached. Their
    /// transcripts are dropped; an unawaited controller is kept for `wait`.
    fn collect_finished(&mut self) -> usize {
        let finished: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|(_, h)| h.bus.is_finished() && h.bus.observer_detached())
            .map(|(id, _)| id.clone())
            .collect();

        for id in &finished {
            let Some(mut handle) = self.sessions.remove(id) else {
                continue;
            };
            if let Some(task) = handle.task.take() {
                self.unclaimed.insert(id.clone(), task);
            }
            if self.active.get(&handle.caller) == Some(id) {
                self.active.remove(&handle.caller);
            }
        }
        finished.len()
    }
}

pub struct DebateService {
    agents: Arc<dyn AgentAdapter>,
    tools: Arc<dyn ToolRouter>,
    config: DebateConfig,
    progress: Arc<dyn DebateProgressNotifier>,
    transcripts: Arc<dyn TranscriptStore>,
    registry: Mutex<Registry>,
}

impl DebateService {
    pub fn new(agents: Arc<dyn AgentAdapter>, tools: Arc<dyn ToolRouter>, config: DebateConfig) -> Self {
        Self {
            agents,
            tools,
            config,
            progress: Arc::new(NoProgress),
            transcripts: Arc::new(NoTranscriptLogger),
            registry: Mutex::new(Registry::default()),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn DebateProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_transcript_store(mut self, store: Arc<dyn TranscriptStore>) -> Self {
        self.transcripts = store;
        self
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Session configuration: service defaults with the request's overrides.
    fn session_config(&self, request: &StartRequest) -> Result<DebateConfig, ConfigurationError> {
        let mut config = self.config.clone();
        if let Some(rounds) = request.round_count {
            config.round_count = rounds;
        }
        if let Some(participants) = &request.participants {
            config.participants = participants.clone();
        }
        if let Some(planner) = request.planner_enabled {
            config.planner_enabled = planner;
        }
        if let Some(judge) = request.judge_enabled {
            config.judge_enabled = judge;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate the request, create the session and start its controller.
    ///
    /// Nothing is created when validation fails. If the caller already has
    /// a session that has not finished, it is stopped and released, or the
    /// call fails, depending on `replace_active_session`.
    pub fn start(&self, caller: &CallerId, request: StartRequest) -> Result<SessionId, ServiceError> {
        let config = self.session_config(&request)?;
        let topic = Topic::new(request.topic)?;
        let roster = config.roster()?;
        let id = SessionId::generate();
        let session = DebateSession::new(id.clone(), topic, roster, config.round_count)?;

        let mut registry = self.lock();
        let collected = registry.collect_finished();
        if collected > 0 {
            debug!("Collected {} finished sessions", collected);
        }
        let running = registry.active.get(caller).cloned().filter(|previous| {
            registry
                .sessions
                .get(previous)
                .is_some_and(|h| !h.bus.is_finished())
        });
        if let Some(previous) = running {
            if !config.replace_active_session {
                return Err(ServiceError::SessionActive {
                    caller: caller.clone(),
                    session: previous,
                });
            }
            info!("Replacing session {} of {}", previous, caller);
            if let Some(handle) = registry.sessions.remove(&previous) {
                handle.cancel.cancel();
            }
        }

        let bus = Arc::new(MessageBus::new(session).with_logger(self.transcripts.open(&id)));
        let cancel = CancellationToken::new();
        let use_case = RunDebateUseCase::new(Arc::clone(&self.agents), Arc::clone(&self.tools), config)
            .with_progress(Arc::clone(&self.progress));
        let task = tokio::spawn({
            let bus = Arc::clone(&bus);
            let cancel = cancel.clone();
            async move { use_case.execute(bus, cancel).await }
        });

        info!("Started session {} for {}", id, caller);
        registry.sessions.insert(
            id.clone(),
            SessionHandle {
                caller: caller.clone(),
                bus,
                cancel,
                task: Some(task),
            },
        );
        registry.active.insert(caller.clone(), id.clone());
        Ok(id)
    }

    /// Attach the subscriber of `id`: replay, then live events.
    pub fn subscribe(&self, id: &SessionId) -> Result<EventStream, ServiceError> {
        Ok(self.bus(id)?.subscribe())
    }

    /// Request a stop. The session ends in `Failed` according to the stop policy.
    pub fn stop(&self, id: &SessionId) -> Result<(), ServiceError> {
        let registry = self.lock();
        let handle = registry
            .sessions
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;
        if !handle.bus.is_finished() {
            info!("Stopping session {}", id);
        }
        handle.cancel.cancel();
        Ok(())
    }

    /// Wait for the controller of `id` to finish.
    pub async fn wait(&self, id: &SessionId) -> Result<DebateSummary, ServiceError> {
        let task = {
            let mut guard = self.lock();
            let registry = &mut *guard;
            match registry.sessions.get_mut(id) {
                Some(handle) => handle
                    .task
                    .take()
                    .ok_or_else(|| ServiceError::AlreadyAwaited(id.clone()))?,
                None => registry
                    .unclaimed
                    .remove(id)
                    .ok_or_else(|| ServiceError::NotFound(id.clone()))?,
            }
        };
        match task.await {
            Ok(result) => Ok(result?),
            Err(e) => Err(ServiceError::TaskFailed(e.to_string())),
        }
    }

    pub fn transcript(&self, id: &SessionId) -> Result<Arc<Vec<DebateEvent>>, ServiceError> {
        Ok(self.bus(id)?.snapshot())
    }

    pub fn overview(&self, id: &SessionId) -> Result<SessionOverview, ServiceError> {
        let bus = self.bus(id)?;
        Ok(SessionOverview {
            id: id.clone(),
            topic: bus.topic(),
            roster: bus.roster(),
            round_count: bus.round_count(),
        })
    }

    pub fn phase(&self, id: &SessionId) -> Result<DebatePhase, ServiceError> {
        Ok(self.bus(id)?.phase())
    }

    pub fn active_session(&self, caller: &CallerId) -> Option<SessionId> {
        self.lock().active.get(caller).cloned()
    }

    /// Forget a session, stopping it first if it is still running.
    pub fn release(&self, id: &SessionId) -> Result<(), ServiceError> {
        let mut registry = self.lock();
        if registry.unclaimed.remove(id).is_some() {
            return Ok(());
        }
        let handle = registry
            .sessions
            .remove(id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;
        handle.cancel.cancel();
        if registry.active.get(&handle.caller) == Some(id) {
            registry.active.remove(&handle.caller);
        }
        Ok(())
    }

    /// Sessions currently held in memory.
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    fn bus(&self, id: &SessionId) -> Result<Arc<MessageBus>, ServiceError> {
        self.lock()
            .sessions
            .get(id)
            .map(|h| Arc::clone(&h.bus))
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingToolRouter, ScriptedAdapter};
    use std::time::Duration;

    fn service(adapter: ScriptedAdapter, config: DebateConfig) -> DebateService {
        DebateService::new(Arc::new(adapter), Arc::new(CountingToolRouter::new()), config)
    }

    fn small_config() -> DebateConfig {
        DebateConfig::default()
            .with_participants(["A", "B"])
            .with_round_count(2)
    }

    #[tokio::test]
    async fn test_start_and_wait_completes() {
        let service = service(ScriptedAdapter::new(), small_config());
        let caller = CallerId::new("user-1");
        let id = service.start(&caller, StartRequest::new("Is remote work here to stay?")).unwrap();
        let overview = service.overview(&id).unwrap();
        assert_eq!(overview.topic.content(), "Is remote work here to stay?");
        assert_eq!(overview.roster.debaters().len(), 2);
        assert_eq!(overview.round_count, 2);

        let summary = service.wait(&id).await.unwrap();
        assert_eq!(summary.final_phase, DebatePhase::Completed);
        assert_eq!(summary.messages, 1 + 2 * 2 + 1);
        assert_eq!(service.phase(&id).unwrap(), DebatePhase::Completed);
        assert_eq!(service.transcript(&id).unwrap().len(), summary.events);
        assert!(matches!(
            service.wait(&id).await,
            Err(ServiceError::AlreadyAwaited(_))
        ));
    }

    #[tokio::test]
    async fn test_subscriber_sees_whole_session_in_order() {
        let adapter = ScriptedAdapter::new().delayed("A", Duration::from_millis(10));
        let service = service(adapter, small_config());
        let id = service
            .start(&CallerId::new("u"), StartRequest::new("Tabs or spaces?"))
            .unwrap();
        let events = service.subscribe(&id).unwrap().collect_all().await;

        assert!(events.last().unwrap().is_terminal());
        for (expected, event) in events.iter().enumerate() {
            assert_eq!(event.sequence, expected as u64);
        }
        let summary = service.wait(&id).await.unwrap();
        assert_eq!(events.len(), summary.events);
    }

    #[tokio::test]
    async fn test_invalid_requests_create_nothing() {
        let service = service(ScriptedAdapter::new(), small_config());
        let caller = CallerId::new("u");

        let err = service.start(&caller, StartRequest::new("   ")).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(ConfigurationError::InvalidTopic(_))));

        let err = service
            .start(&caller, StartRequest::new("Topic").with_round_count(0))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Configuration(ConfigurationError::InvalidRoundCount)
        ));

        let err = service
            .start(&caller, StartRequest::new("Topic").with_participants(Vec::<&str>::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Configuration(ConfigurationError::EmptyParticipants)
        ));

        assert!(service.active_session(&caller).is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let service = service(ScriptedAdapter::new(), small_config());
        let missing = SessionId::new("missing");
        assert!(matches!(service.stop(&missing), Err(ServiceError::NotFound(_))));
        assert!(matches!(service.subscribe(&missing), Err(ServiceError::NotFound(_))));
        assert!(matches!(service.release(&missing), Err(ServiceError::NotFound(_))));
        assert!(matches!(
            service.wait(&missing).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_new_session_replaces_active_one() {
        let service = service(ScriptedAdapter::new().hanging("B"), small_config());
        let caller = CallerId::new("u");
        let first = service.start(&caller, StartRequest::new("First topic")).unwrap();
        let first_stream = service.subscribe(&first).unwrap();

        let second = service.start(&caller, StartRequest::new("Second topic")).unwrap();
        assert_ne!(first, second);
        assert_eq!(service.active_session(&caller), Some(second.clone()));
        assert!(matches!(service.phase(&first), Err(ServiceError::NotFound(_))));

        let events = first_stream.collect_all().await;
        let last = events.last().unwrap();
        assert_eq!(last.entry.as_phase_change().unwrap().to, DebatePhase::Failed);

        service.stop(&second).unwrap();
        assert!(service.wait(&second).await.unwrap().stopped);
    }

    #[tokio::test]
    async fn test_active_session_rejected_without_replacement() {
        let config = small_config().with_replace_active_session(false);
        let service = service(ScriptedAdapter::new().hanging("A"), config);
        let caller = CallerId::new("u");
        let first = service.start(&caller, StartRequest::new("First topic")).unwrap();

        let err = service.start(&caller, StartRequest::new("Second")).unwrap_err();
        assert!(matches!(err, ServiceError::SessionActive { .. }));

        // Another caller is unaffected
        let other = service
            .start(&CallerId::new("someone-else"), StartRequest::new("Second"))
            .unwrap();
        service.release(&other).unwrap();

        service.stop(&first).unwrap();
        let summary = service.wait(&first).await.unwrap();
        assert!(summary.stopped);
        assert_eq!(summary.final_phase, DebatePhase::Failed);

        // Finished sessions no longer block the caller
        assert!(service.start(&caller, StartRequest::new("Third")).is_ok());
    }

    #[tokio::test]
    async fn test_request_overrides_service_defaults() {
        let service = service(ScriptedAdapter::new(), small_config());
        let id = service
            .start(
                &CallerId::new("u"),
                StartRequest::new("Override")
                    .with_participants(["X", "Y", "Z"])
                    .with_round_count(1)
                    .with_planner(false)
                    .with_judge(false),
            )
            .unwrap();
        let summary = service.wait(&id).await.unwrap();
        assert_eq!(summary.messages, 3);
    }

    #[tokio::test]
    async fn test_finished_sessions_are_collected_after_observer_detaches() {
        let service = service(ScriptedAdapter::new(), small_config());
        let caller = CallerId::new("u");

        for i in 0..20 {
            let id = service
                .start(&caller, StartRequest::new(format!("Topic number {}", i)))
                .unwrap();
            let events = service.subscribe(&id).unwrap().collect_all().await;
            assert!(events.last().unwrap().is_terminal());
            service.wait(&id).await.unwrap();
        }

        // Only the latest session survives until the next start
        assert_eq!(service.session_count(), 1);
    }

    #[tokio::test]
    async fn test_collected_session_can_still_be_awaited() {
        let service = service(ScriptedAdapter::new(), small_config());
        let caller = CallerId::new("u");
        let first = service.start(&caller, StartRequest::new("First topic")).unwrap();
        service.subscribe(&first).unwrap().collect_all().await;

        let second = service
            .start(&CallerId::new("other"), StartRequest::new("Second topic"))
            .unwrap();
        assert!(matches!(service.transcript(&first), Err(ServiceError::NotFound(_))));
        assert!(service.active_session(&caller).is_none());

        let summary = service.wait(&first).await.unwrap();
        assert_eq!(summary.final_phase, DebatePhase::Completed);
        assert!(matches!(service.wait(&first).await, Err(ServiceError::NotFound(_))));
        service.wait(&second).await.unwrap();
    }

    #[tokio::test]
    async fn test_unobserved_sessions_stay_until_released() {
        let service = service(ScriptedAdapter::new(), small_config());
        let first = service
            .start(&CallerId::new("a"), StartRequest::new("First topic"))
            .unwrap();
        service.wait(&first).await.unwrap();

        service
            .start(&CallerId::new("b"), StartRequest::new("Second topic"))
            .unwrap();
        assert_eq!(service.phase(&first).unwrap(), DebatePhase::Completed);
        assert_eq!(service.session_count(), 2);

        service.release(&first).unwrap();
        assert_eq!(service.session_count(), 1);
    }

    #[tokio::test]
    async fn test_release_forgets_session() {
        let service = service(ScriptedAdapter::new(), small_config());
        let caller = CallerId::new("u");
        let id = service.start(&caller, StartRequest::new("Release me")).unwrap();
        service.release(&id).unwrap();
        assert!(service.active_session(&caller).is_none());
        assert!(matches!(service.transcript(&id), Err(ServiceError::NotFound(_))));
    }
}
