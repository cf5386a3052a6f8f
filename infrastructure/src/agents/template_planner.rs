//! Deterministic planner: emits the structured debate plan, no model call.

use async_trait::async_trait;
use debate_application::{AdapterError, AgentAdapter, AgentReply, TurnRequest};
use debate_domain::{DebatePromptTemplate, TurnStatus};

pub struct TemplatePlannerAdapter;

#[async_trait]
impl AgentAdapter for TemplatePlannerAdapter {
    async fn generate(&self, request: &TurnRequest) -> Result<AgentReply, AdapterError> {
        Ok(
            AgentReply::text(DebatePromptTemplate::structured_plan(request.topic.content()))
                .with_status(TurnStatus::Reading),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::turn_request;
    use debate_domain::{AgentId, AgentRole, DebatePhase};

    #[tokio::test]
    async fn plan_names_the_topic_and_asks_to_be_read() {
        let request = turn_request(
            AgentRole::Planner,
            AgentId::planner(),
            DebatePhase::Planning,
            -1,
            Vec::new(),
        );
        let reply = TemplatePlannerAdapter.generate(&request).await.unwrap();
        assert!(reply.content.starts_with("Structured Debate Plan"));
        assert!(reply.content.contains(request.topic.content()));
        assert_eq!(reply.status, Some(TurnStatus::Reading));
        assert!(reply.tool_requests.is_empty());
    }
}
