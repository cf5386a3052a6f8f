//! Debate configuration: orchestration policy for one session.
//!
//! [`DebateConfig`] is loaded once (see the infrastructure config loader),
//! validated, and then threaded by value into every session the service
//! starts. Per-session overrides from a start request produce a new value;
//! a running session never observes configuration changes.

use debate_domain::{AgentId, ConfigurationError, DebateRoster};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happens to the session when a turn fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnFailurePolicy {
    /// Record a failure marker and carry on
    #[default]
    Continue,
    /// Record a failure marker and end the session in `Failed`
    Abort,
}

impl std::str::FromStr for TurnFailurePolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(TurnFailurePolicy::Continue),
            "abort" => Ok(TurnFailurePolicy::Abort),
            other => Err(ConfigurationError::InvalidSetting {
                key: "on_turn_failure".to_string(),
                reason: format!("expected 'continue' or 'abort', got '{}'", other),
            }),
        }
    }
}

/// What happens to in-flight turns when a session is stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopPolicy {
    /// Abort in-flight turns; their output is discarded
    #[default]
    Abandon,
    /// Let in-flight turns finish and record them before the session fails
    Drain,
}

impl std::str::FromStr for StopPolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abandon" => Ok(StopPolicy::Abandon),
            "drain" => Ok(StopPolicy::Drain),
            other => Err(ConfigurationError::InvalidSetting {
                key: "on_stop".to_string(),
                reason: format!("expected 'abandon' or 'drain', got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Debaters in turn order
    pub participants: Vec<AgentId>,
    pub round_count: u32,
    pub planner_enabled: bool,
    pub judge_enabled: bool,
    /// Accepted tool invocations per agent per round
    pub tool_budget_per_round: u32,
    /// Run a round's turns concurrently (re-sequenced before publication)
    pub parallel_round_dispatch: bool,
    /// Wait for every debater before starting the next round
    pub barriered_rounds: bool,
    pub on_turn_failure: TurnFailurePolicy,
    pub on_stop: StopPolicy,
    /// Bound on a single adapter invocation
    pub turn_timeout: Option<Duration>,
    /// Adapter re-invocations carrying tool results within one turn
    pub max_tool_steps: usize,
    /// Starting a session replaces the caller's active one instead of failing
    pub replace_active_session: bool,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            participants: vec![
                AgentId::new("OpenAI"),
                AgentId::new("Claude"),
                AgentId::new("Gemini"),
            ],
            round_count: 3,
            planner_enabled: true,
            judge_enabled: true,
            tool_budget_per_round: 3,
            parallel_round_dispatch: true,
            barriered_rounds: true,
            on_turn_failure: TurnFailurePolicy::Continue,
            on_stop: StopPolicy::Abandon,
            turn_timeout: Some(Duration::from_secs(120)),
            max_tool_steps: 4,
            replace_active_session: true,
        }
    }
}

impl DebateConfig {
    // ==================== Builder Methods ====================

    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AgentId>,
    {
        self.participants = participants.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_round_count(mut self, rounds: u32) -> Self {
        self.round_count = rounds;
        self
    }

    pub fn with_planner(mut self, enabled: bool) -> Self {
        self.planner_enabled = enabled;
        self
    }

    pub fn with_judge(mut self, enabled: bool) -> Self {
        self.judge_enabled = enabled;
        self
    }

    pub fn with_tool_budget(mut self, budget: u32) -> Self {
        self.tool_budget_per_round = budget;
        self
    }

    pub fn with_parallel_dispatch(mut self, parallel: bool) -> Self {
        self.parallel_round_dispatch = parallel;
        self
    }

    pub fn with_barriered_rounds(mut self, barriered: bool) -> Self {
        self.barriered_rounds = barriered;
        self
    }

    pub fn with_turn_failure_policy(mut self, policy: TurnFailurePolicy) -> Self {
        self.on_turn_failure = policy;
        self
    }

    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.on_stop = policy;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_max_tool_steps(mut self, steps: usize) -> Self {
        self.max_tool_steps = steps;
        self
    }

    pub fn with_replace_active_session(mut self, replace: bool) -> Self {
        self.replace_active_session = replace;
        self
    }

    // ==================== Validation ====================

    /// Build the roster this configuration describes.
    pub fn roster(&self) -> Result<DebateRoster, ConfigurationError> {
        DebateRoster::with_defaults(
            self.participants.clone(),
            self.planner_enabled,
            self.judge_enabled,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.round_count == 0 {
            return Err(ConfigurationError::InvalidRoundCount);
        }
        if self.turn_timeout == Some(Duration::ZERO) {
            return Err(ConfigurationError::InvalidSetting {
                key: "turn_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        self.roster().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DebateConfig::default();
        assert_eq!(config.participants.len(), 3);
        assert_eq!(config.round_count, 3);
        assert_eq!(config.tool_budget_per_round, 3);
        assert!(config.parallel_round_dispatch);
        assert!(config.barriered_rounds);
        assert_eq!(config.on_turn_failure, TurnFailurePolicy::Continue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rounds_invalid() {
        let config = DebateConfig::default().with_round_count(0);
        assert_eq!(config.validate(), Err(ConfigurationError::InvalidRoundCount));
    }

    #[test]
    fn test_empty_participants_invalid() {
        let config = DebateConfig::default().with_participants(Vec::<AgentId>::new());
        assert_eq!(config.validate(), Err(ConfigurationError::EmptyParticipants));
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let config = DebateConfig::default().with_turn_timeout(Some(Duration::ZERO));
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Abort".parse::<TurnFailurePolicy>(), Ok(TurnFailurePolicy::Abort));
        assert_eq!("drain".parse::<StopPolicy>(), Ok(StopPolicy::Drain));
        assert!("later".parse::<StopPolicy>().is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = DebateConfig::default()
            .with_participants(["A", "B"])
            .with_planner(false)
            .with_tool_budget(0);
        let roster = config.roster().unwrap();
        assert_eq!(roster.debaters().len(), 2);
        assert!(roster.planner().is_none());
        assert_eq!(config.tool_budget_per_round, 0);
    }
}
