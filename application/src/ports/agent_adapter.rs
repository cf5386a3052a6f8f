//! Agent Adapter port
//!
//! One capability surface for every role: given the turn context, produce
//! content and optionally ask for tool calls. Planner, debaters and judge
//! differ only in the [`AgentRole`] tag carried by the request.

use async_trait::async_trait;
use debate_domain::{
    AgentId, AgentRole, DebateEvent, DebatePhase, DebatePromptTemplate, DebateRoster, MessageKind,
    QualifiedCapability, ToolOutcome, ToolRequest, Topic, TurnStatus, render_debater_history,
    render_history,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors an adapter can report for a turn
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Turn timed out")]
    Timeout,
}

/// A resolved tool request handed back to the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolExchange {
    pub request: ToolRequest,
    pub outcome: ToolOutcome,
}

/// Everything an adapter gets to see for one invocation.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub topic: Topic,
    pub agent: AgentId,
    pub role: AgentRole,
    pub phase: DebatePhase,
    /// −1 for planning, R for judgment
    pub round: i32,
    pub roster: DebateRoster,
    /// Transcript as of the start of the turn (shared by a whole barriered round)
    pub transcript: Arc<Vec<DebateEvent>>,
    /// Tool invocations this agent may still make in this round
    pub remaining_budget: u32,
    pub capabilities: Arc<Vec<QualifiedCapability>>,
    /// Tool calls already resolved earlier in this turn
    pub tool_results: Vec<ToolExchange>,
}

impl TurnRequest {
    /// Kind of message this turn publishes.
    pub fn expected_kind(&self) -> Option<MessageKind> {
        self.phase.message_kind()
    }

    /// The transcript as this agent should read it.
    pub fn history(&self) -> String {
        match self.role {
            AgentRole::Debater => {
                render_debater_history(&self.transcript, &self.agent, &self.roster)
            }
            AgentRole::Planner | AgentRole::Judge => render_history(&self.transcript),
        }
    }

    /// Render the role prompt, with resolved tool results appended.
    pub fn render_prompt(&self, role_hint: Option<&str>) -> String {
        let mut prompt = match self.role {
            AgentRole::Planner => {
                let debaters: Vec<String> =
                    self.roster.debaters().iter().map(|d| d.to_string()).collect();
                DebatePromptTemplate::planning(self.agent.as_str(), self.topic.content(), &debaters)
            }
            AgentRole::Debater => DebatePromptTemplate::debate_round(
                self.agent.as_str(),
                self.topic.content(),
                self.round.max(1) as u32,
                role_hint,
                &self.history(),
            ),
            AgentRole::Judge => {
                DebatePromptTemplate::judgment(self.topic.content(), &self.history())
            }
        };

        if !self.tool_results.is_empty() {
            let results: Vec<(String, String)> = self
                .tool_results
                .iter()
                .map(|ex| (ex.request.capability.clone(), ex.outcome.summary()))
                .collect();
            prompt.push('\n');
            prompt.push_str(&DebatePromptTemplate::tool_results(&results));
        }
        prompt
    }
}

/// What an adapter produced for one invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentReply {
    pub content: String,
    /// Advisory only; the controller derives the kind from the phase
    pub kind: Option<MessageKind>,
    pub status: Option<TurnStatus>,
    pub tool_requests: Vec<ToolRequest>,
}

impl AgentReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: TurnStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tool_requests(mut self, requests: Vec<ToolRequest>) -> Self {
        self.tool_requests = requests;
        self
    }
}

/// Uniform surface over language-model backends and fixed-behavior agents.
///
/// Implementations are stateless per call; everything they need is in the
/// [`TurnRequest`].
#[async_trait]
pub trait AgentAdapter: Send + Sync {
    async fn generate(&self, request: &TurnRequest) -> Result<AgentReply, AdapterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{DebateSession, SessionId, ToolError};
    use serde_json::json;

    fn request(role: AgentRole, agent: AgentId, phase: DebatePhase, round: i32) -> TurnRequest {
        let roster = DebateRoster::with_defaults(
            vec![AgentId::new("A"), AgentId::new("B")],
            true,
            true,
        )
        .unwrap();
        let mut session = DebateSession::new(
            SessionId::new("s"),
            Topic::new("Is Rust fast?").unwrap(),
            roster.clone(),
            1,
        )
        .unwrap();
        session.transition(DebatePhase::Planning).unwrap();
        session
            .record_message(DebatePhase::Planning, AgentId::planner(), "the plan".into(), None)
            .unwrap();
        session.transition(DebatePhase::Round(1)).unwrap();
        session
            .record_message(DebatePhase::Round(1), AgentId::new("B"), "B says".into(), None)
            .unwrap();

        TurnRequest {
            topic: session.topic().clone(),
            agent,
            role,
            phase,
            round,
            roster,
            transcript: Arc::new(session.transcript().to_vec()),
            remaining_budget: 3,
            capabilities: Arc::new(Vec::new()),
            tool_results: Vec::new(),
        }
    }

    #[test]
    fn test_debater_prompt_hides_planner_and_own_messages() {
        let req = request(AgentRole::Debater, AgentId::new("B"), DebatePhase::Round(1), 1);
        let prompt = req.render_prompt(Some("skeptic"));
        assert!(prompt.contains("This is my round-1:"));
        assert!(prompt.contains("skeptic"));
        assert!(!prompt.contains("B says"));
        assert!(!prompt.contains("the plan"));
    }

    #[test]
    fn test_judge_prompt_sees_everything() {
        let req = request(AgentRole::Judge, AgentId::judge(), DebatePhase::Judgment, 1);
        let prompt = req.render_prompt(None);
        assert!(prompt.contains("B says"));
        assert!(prompt.contains("the plan"));
        assert_eq!(req.expected_kind(), Some(MessageKind::FinalConclusion));
    }

    #[test]
    fn test_tool_results_are_appended() {
        let mut req = request(AgentRole::Debater, AgentId::new("A"), DebatePhase::Round(1), 1);
        req.tool_results.push(ToolExchange {
            request: ToolRequest::new("web:search", json!({"q": "rust"})),
            outcome: ToolOutcome::Failed {
                error: ToolError::execution_failed("rate limited"),
            },
        });
        let prompt = req.render_prompt(None);
        assert!(prompt.contains("--- web:search ---"));
        assert!(prompt.contains("rate limited"));
    }
}
