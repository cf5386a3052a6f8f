//! Agent identity value objects
//!
//! Agents are named roles, not owned objects: every message, tool call and
//! failure marker refers to its agent by [`AgentId`] value.

use serde::{Deserialize, Serialize};

/// Identifier of a debate participant (e.g. "OpenAI", "Claude", "Planner").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Default identifier of the planner agent.
    pub fn planner() -> Self {
        Self::new("Planner")
    }

    /// Default identifier of the judge agent.
    pub fn judge() -> Self {
        Self::new("Judge")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name is reserved for the planner or the judge.
    pub fn is_reserved(&self) -> bool {
        let lower = self.0.trim().to_lowercase();
        lower == "planner" || lower == "judge"
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The part an agent plays in a debate.
///
/// Roles differ only in *when* the agent is invoked and *how* recipients of
/// its messages are computed; every role uses the same adapter interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Planner,
    Debater,
    Judge,
}

impl AgentRole {
    pub fn as_str(&self) -> &str {
        match self {
            AgentRole::Planner => "planner",
            AgentRole::Debater => "debater",
            AgentRole::Judge => "judge",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            AgentRole::Planner => "Planner",
            AgentRole::Debater => "Agent",
            AgentRole::Judge => "Judge",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names_are_case_insensitive() {
        assert!(AgentId::new("planner").is_reserved());
        assert!(AgentId::new(" JUDGE ").is_reserved());
        assert!(!AgentId::new("Claude").is_reserved());
    }

    #[test]
    fn test_agent_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&AgentId::new("Gemini")).unwrap();
        assert_eq!(json, "\"Gemini\"");
    }

    #[test]
    fn test_role_display_names() {
        assert_eq!(AgentRole::Debater.display_name(), "Agent");
        assert_eq!(AgentRole::Judge.to_string(), "judge");
    }
}
