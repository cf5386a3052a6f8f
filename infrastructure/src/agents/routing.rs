//! Per-agent adapter routing
//!
//! Picks the adapter configured under `[agents.<name>]` for each turn, with
//! role-based fallbacks for agents that have no section.

use super::openai::OpenAiCompatibleAdapter;
use super::placeholder::PlaceholderAdapter;
use super::template_planner::TemplatePlannerAdapter;
use crate::config::{AgentProvider, FileAgentConfig, FileConfig};
use async_trait::async_trait;
use debate_application::{AdapterError, AgentAdapter, AgentReply, TurnRequest};
use debate_domain::{AgentId, AgentRole};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Dispatches each turn to the adapter configured for its agent.
///
/// Lookup is by agent name, case-insensitively. Unconfigured agents fall
/// back by role: the planner gets the template planner, debaters and the
/// judge get the placeholder adapter.
pub struct RoutingAgentAdapter {
    configured: HashMap<String, (AgentProvider, Arc<dyn AgentAdapter>)>,
    planner_default: Arc<dyn AgentAdapter>,
    default: Arc<dyn AgentAdapter>,
}

impl Default for RoutingAgentAdapter {
    fn default() -> Self {
        Self {
            configured: HashMap::new(),
            planner_default: Arc::new(TemplatePlannerAdapter),
            default: Arc::new(PlaceholderAdapter),
        }
    }
}

impl RoutingAgentAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FileConfig) -> Self {
        config
            .agents
            .iter()
            .fold(Self::new(), |router, (name, agent)| {
                router.with_agent(name, agent.provider, build_adapter(name, agent))
            })
    }

    pub fn with_agent(
        mut self,
        name: &str,
        provider: AgentProvider,
        adapter: Arc<dyn AgentAdapter>,
    ) -> Self {
        self.configured
            .insert(name.trim().to_lowercase(), (provider, adapter));
        self
    }

    /// Provider backing `agent` when it plays `role`.
    pub fn provider_for(&self, agent: &AgentId, role: AgentRole) -> AgentProvider {
        match self.configured.get(&agent.as_str().to_lowercase()) {
            Some((provider, _)) => *provider,
            None if role == AgentRole::Planner => AgentProvider::Template,
            None => AgentProvider::Placeholder,
        }
    }

    fn resolve(&self, agent: &AgentId, role: AgentRole) -> &Arc<dyn AgentAdapter> {
        match self.configured.get(&agent.as_str().to_lowercase()) {
            Some((_, adapter)) => adapter,
            None if role == AgentRole::Planner => &self.planner_default,
            None => &self.default,
        }
    }
}

fn build_adapter(name: &str, config: &FileAgentConfig) -> Arc<dyn AgentAdapter> {
    match config.provider {
        AgentProvider::OpenAi => {
            let api_key = std::env::var(&config.api_key_env).ok();
            if api_key.is_none() {
                warn!(
                    "Agent {}: {} is not set, its turns will fail",
                    name, config.api_key_env
                );
            }
            Arc::new(
                OpenAiCompatibleAdapter::new(&config.base_url, &config.model)
                    .with_api_key(api_key)
                    .with_role_hint(config.role_hint.clone()),
            )
        }
        AgentProvider::Template => Arc::new(TemplatePlannerAdapter),
        AgentProvider::Placeholder => Arc::new(PlaceholderAdapter),
    }
}

#[async_trait]
impl AgentAdapter for RoutingAgentAdapter {
    async fn generate(&self, request: &TurnRequest) -> Result<AgentReply, AdapterError> {
        debug!(
            "Routing {} ({}) to {:?}",
            request.agent,
            request.role,
            self.provider_for(&request.agent, request.role)
        );
        self.resolve(&request.agent, request.role)
            .generate(request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::turn_request;
    use debate_domain::DebatePhase;

    struct Fixed(&'static str);

    #[async_trait]
    impl AgentAdapter for Fixed {
        async fn generate(&self, _request: &TurnRequest) -> Result<AgentReply, AdapterError> {
            Ok(AgentReply::text(self.0))
        }
    }

    #[tokio::test]
    async fn configured_agents_win_case_insensitively() {
        let router = RoutingAgentAdapter::new().with_agent(
            "claude",
            AgentProvider::OpenAi,
            Arc::new(Fixed("from claude")),
        );
        let request = turn_request(
            AgentRole::Debater,
            AgentId::new("Claude"),
            DebatePhase::Round(1),
            1,
            Vec::new(),
        );
        let reply = router.generate(&request).await.unwrap();
        assert_eq!(reply.content, "from claude");
        assert_eq!(
            router.provider_for(&AgentId::new("CLAUDE"), AgentRole::Debater),
            AgentProvider::OpenAi
        );
    }

    #[tokio::test]
    async fn unconfigured_agents_fall_back_by_role() {
        let router = RoutingAgentAdapter::new();

        let planner = turn_request(
            AgentRole::Planner,
            AgentId::planner(),
            DebatePhase::Planning,
            -1,
            Vec::new(),
        );
        let reply = router.generate(&planner).await.unwrap();
        assert!(reply.content.starts_with("Structured Debate Plan"));

        let debater = turn_request(
            AgentRole::Debater,
            AgentId::new("Gemini"),
            DebatePhase::Round(1),
            1,
            Vec::new(),
        );
        let reply = router.generate(&debater).await.unwrap();
        assert!(reply.content.starts_with("This is my round-1:"));
        assert_eq!(
            router.provider_for(&AgentId::judge(), AgentRole::Judge),
            AgentProvider::Placeholder
        );
    }

    #[test]
    fn from_config_reads_agent_sections() {
        let config: FileConfig = toml::from_str(
            r#"
[agents.Planner]
provider = "placeholder"

[agents.OpenAI]
provider = "openai"
api_key_env = "DEBATE_TEST_KEY_THAT_IS_NOT_SET"
"#,
        )
        .unwrap();
        let router = RoutingAgentAdapter::from_config(&config);
        assert_eq!(
            router.provider_for(&AgentId::planner(), AgentRole::Planner),
            AgentProvider::Placeholder
        );
        assert_eq!(
            router.provider_for(&AgentId::new("openai"), AgentRole::Debater),
            AgentProvider::OpenAi
        );
    }
}
