//! Placeholder adapter: canned, deterministic output for any role.
//!
//! Used for debaters without an `[agents.<name>]` section so a debate runs
//! end to end without credentials. Debaters make one tool request per turn
//! when a capability is available and budget remains.

use async_trait::async_trait;
use debate_application::{AdapterError, AgentAdapter, AgentReply, TurnRequest};
use debate_domain::{AgentRole, ToolRequest, TurnStatus, preferred_capability};
use serde_json::{Value, json};

pub struct PlaceholderAdapter;

impl PlaceholderAdapter {
    /// Arguments for the preferred capability: `{q, count}` for search-like
    /// tools, `{text}` otherwise.
    pub fn tool_arguments(capability: &str, request: &TurnRequest) -> Value {
        if capability.to_lowercase().contains("search") {
            json!({ "q": request.topic.content(), "count": 3 })
        } else {
            json!({
                "text": format!(
                    "{} requesting brief evidence on: {}",
                    request.agent,
                    request.topic.content()
                )
            })
        }
    }

    fn tool_request(request: &TurnRequest) -> Option<ToolRequest> {
        if request.role != AgentRole::Debater
            || request.remaining_budget == 0
            || !request.tool_results.is_empty()
        {
            return None;
        }
        let capability = preferred_capability(&request.capabilities)?.qualified();
        let arguments = Self::tool_arguments(&capability, request);
        Some(ToolRequest::new(capability, arguments))
    }

    fn content(request: &TurnRequest) -> String {
        let topic = request.topic.content();
        match request.role {
            AgentRole::Planner => format!(
                "{}: plan for \"{}\". Each debater takes a distinct stance, cites evidence and answers every opposing point.",
                request.agent, topic
            ),
            AgentRole::Debater => {
                let evidence = if request.tool_results.is_empty() {
                    String::new()
                } else {
                    let used: Vec<&str> = request
                        .tool_results
                        .iter()
                        .map(|ex| ex.request.capability.as_str())
                        .collect();
                    format!(" Evidence consulted: {}.", used.join(", "))
                };
                format!(
                    "This is my round-{}: {} holds a placeholder position on \"{}\".{}",
                    request.round.max(1),
                    request.agent,
                    topic,
                    evidence
                )
            }
            AgentRole::Judge => {
                let messages = request
                    .transcript
                    .iter()
                    .filter(|e| e.entry.as_message().is_some())
                    .count();
                format!(
                    "{}: placeholder conclusion on \"{}\" after {} messages. Confidence: 0.5.",
                    request.agent, topic, messages
                )
            }
        }
    }
}

#[async_trait]
impl AgentAdapter for PlaceholderAdapter {
    async fn generate(&self, request: &TurnRequest) -> Result<AgentReply, AdapterError> {
        if let Some(tool) = Self::tool_request(request) {
            return Ok(AgentReply::text("Gathering evidence").with_tool_requests(vec![tool]));
        }
        Ok(AgentReply::text(Self::content(request)).with_status(TurnStatus::Complete))
    }
}
