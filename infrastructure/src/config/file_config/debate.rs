//! Debate configuration from TOML (`[debate]` section)

use debate_application::{DebateConfig, StopPolicy, TurnFailurePolicy};
use debate_domain::{AgentId, ConfigurationError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Participant list, either as an array or as a comma-separated string
/// (the latter is what `DEBATE_DEBATE__PARTICIPANTS=A,B,C` produces).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantList {
    List(Vec<String>),
    Csv(String),
}

impl ParticipantList {
    pub fn names(&self) -> Vec<String> {
        match self {
            ParticipantList::List(names) => names.iter().map(|n| n.trim().to_string()).collect(),
            ParticipantList::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for ParticipantList {
    fn default() -> Self {
        ParticipantList::List(vec![
            "OpenAI".to_string(),
            "Claude".to_string(),
            "Gemini".to_string(),
        ])
    }
}

/// Raw debate configuration from TOML
///
/// # Example
///
/// ```toml
/// [debate]
/// participants = ["OpenAI", "Claude", "Gemini"]
/// round_count = 3
/// planner_enabled = true
/// judge_enabled = true
/// tool_budget_per_round = 3
/// parallel_round_dispatch = true
/// barriered_rounds = true
/// on_turn_failure = "continue"   # "continue" or "abort"
/// on_stop = "abandon"            # "abandon" or "drain"
/// turn_timeout_secs = 120        # 0 disables the timeout
/// max_tool_steps = 4
/// replace_active_session = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub participants: ParticipantList,
    pub round_count: u32,
    pub planner_enabled: bool,
    pub judge_enabled: bool,
    pub tool_budget_per_round: u32,
    pub parallel_round_dispatch: bool,
    pub barriered_rounds: bool,
    pub on_turn_failure: String,
    pub on_stop: String,
    pub turn_timeout_secs: u64,
    pub max_tool_steps: usize,
    pub replace_active_session: bool,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            participants: ParticipantList::default(),
            round_count: 3,
            planner_enabled: true,
            judge_enabled: true,
            tool_budget_per_round: 3,
            parallel_round_dispatch: true,
            barriered_rounds: true,
            on_turn_failure: "continue".to_string(),
            on_stop: "abandon".to_string(),
            turn_timeout_secs: 120,
            max_tool_steps: 4,
            replace_active_session: true,
        }
    }
}

impl FileDebateConfig {
    /// Convert into the immutable application config, failing fast on
    /// anything that cannot be interpreted.
    pub fn to_debate_config(&self) -> Result<DebateConfig, ConfigurationError> {
        let on_turn_failure: TurnFailurePolicy = self.on_turn_failure.parse()?;
        let on_stop: StopPolicy = self.on_stop.parse()?;
        let turn_timeout =
            (self.turn_timeout_secs > 0).then(|| Duration::from_secs(self.turn_timeout_secs));

        let config = DebateConfig::default()
            .with_participants(self.participants.names().into_iter().map(AgentId::new))
            .with_round_count(self.round_count)
            .with_planner(self.planner_enabled)
            .with_judge(self.judge_enabled)
            .with_tool_budget(self.tool_budget_per_round)
            .with_parallel_dispatch(self.parallel_round_dispatch)
            .with_barriered_rounds(self.barriered_rounds)
            .with_turn_failure_policy(on_turn_failure)
            .with_stop_policy(on_stop)
            .with_turn_timeout(turn_timeout)
            .with_max_tool_steps(self.max_tool_steps)
            .with_replace_active_session(self.replace_active_session);

        config.validate()?;
        Ok(config)
    }
}
