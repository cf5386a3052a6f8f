//! Scripted adapters and helpers shared by the controller and service tests.

use crate::bus::MessageBus;
use crate::config::DebateConfig;
use crate::ports::agent_adapter::{AdapterError, AgentAdapter, AgentReply, ToolExchange, TurnRequest};
use crate::ports::tool_router::ToolRouter;
use async_trait::async_trait;
use debate_domain::{
    AgentId, DebateEvent, DebatePhase, DebateSession, QualifiedCapability, SessionId, ToolError,
    ToolRequest, Topic,
};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What an adapter saw on one invocation.
#[derive(Debug, Clone)]
pub(crate) struct SeenTurn {
    pub agent: AgentId,
    pub phase: DebatePhase,
    pub messages_seen: usize,
    pub remaining_budget: u32,
    pub tool_results: Vec<ToolExchange>,
}

/// Deterministic adapter: replies depend only on the agent, the phase and
/// the transcript snapshot, never on timing.
#[derive(Default)]
pub(crate) struct ScriptedAdapter {
    failing: HashSet<(AgentId, i32)>,
    tool_plan: HashMap<AgentId, Vec<ToolRequest>>,
    delays: HashMap<AgentId, Duration>,
    hanging: HashSet<AgentId>,
    always_tools: bool,
    seen: Mutex<Vec<SeenTurn>>,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, agent: &str, round: i32) -> Self {
        self.failing.insert((AgentId::new(agent), round));
        self
    }

    /// `agent` asks for `requests` on the first invocation of each turn.
    pub fn requesting(mut self, agent: &str, requests: Vec<ToolRequest>) -> Self {
        self.tool_plan.insert(AgentId::new(agent), requests);
        self
    }

    /// Keep asking for the same tools even after getting results.
    pub fn always_requesting_tools(mut self) -> Self {
        self.always_tools = true;
        self
    }

    pub fn delayed(mut self, agent: &str, delay: Duration) -> Self {
        self.delays.insert(AgentId::new(agent), delay);
        self
    }

    pub fn hanging(mut self, agent: &str) -> Self {
        self.hanging.insert(AgentId::new(agent));
        self
    }

    pub fn seen(&self) -> Vec<SeenTurn> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentAdapter for ScriptedAdapter {
    async fn generate(&self, request: &TurnRequest) -> Result<AgentReply, AdapterError> {
        let messages_seen = request
            .transcript
            .iter()
            .filter(|e| e.entry.as_message().is_some())
            .count();
        self.seen.lock().unwrap().push(SeenTurn {
            agent: request.agent.clone(),
            phase: request.phase,
            messages_seen,
            remaining_budget: request.remaining_budget,
            tool_results: request.tool_results.clone(),
        });

        if self.hanging.contains(&request.agent) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if let Some(delay) = self.delays.get(&request.agent) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&(request.agent.clone(), request.round)) {
            return Err(AdapterError::RequestFailed("scripted failure".to_string()));
        }

        if let Some(requests) = self.tool_plan.get(&request.agent) {
            if request.tool_results.is_empty() || self.always_tools {
                return Ok(AgentReply::text("checking sources").with_tool_requests(requests.clone()));
            }
        }

        Ok(AgentReply::text(format!(
            "{} in {} after {} messages and {} tool results",
            request.agent,
            request.phase.label(),
            messages_seen,
            request.tool_results.len()
        )))
    }
}

/// Router with one echo capability. `broken:*` capabilities always fail.
pub(crate) struct CountingToolRouter {
    invocations: AtomicUsize,
}

impl CountingToolRouter {
    pub fn new() -> Self {
        Self {
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolRouter for CountingToolRouter {
    fn capabilities(&self) -> Vec<QualifiedCapability> {
        vec![QualifiedCapability::new("local-stub", "echo")]
    }

    async fn invoke(&self, capability: &str, arguments: &Value) -> Result<Value, ToolError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if capability.starts_with("broken:") {
            return Err(ToolError::execution_failed("backend exploded"));
        }
        Ok(json!({ "capability": capability, "echo": arguments }))
    }
}

pub(crate) fn new_bus(config: &DebateConfig) -> Arc<MessageBus> {
    let session = DebateSession::new(
        SessionId::generate(),
        Topic::new("Should cities ban cars from downtown?").unwrap(),
        config.roster().unwrap(),
        config.round_count,
    )
    .unwrap();
    Arc::new(MessageBus::new(session))
}

/// Events as JSON with wall-clock timestamps removed.
pub(crate) fn strip_timestamps(events: &[DebateEvent]) -> Vec<Value> {
    events
        .iter()
        .map(|event| {
            let mut value = serde_json::to_value(event).unwrap();
            if let Some(payload) = value.get_mut("payload").and_then(Value::as_object_mut) {
                payload.remove("timestamp");
            }
            value
        })
        .collect()
}
