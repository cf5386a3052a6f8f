//! Debate roster: who takes part and in which role

use super::phase::PhasePlan;
use crate::core::agent::{AgentId, AgentRole};
use crate::core::error::ConfigurationError;
use std::collections::HashSet;

/// Validated participant set of one debate.
///
/// Debaters keep their configured order; that order drives both sequential
/// dispatch and the re-sequencing of parallel turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateRoster {
    debaters: Vec<AgentId>,
    planner: Option<AgentId>,
    judge: Option<AgentId>,
}

impl DebateRoster {
    pub fn new(
        debaters: Vec<AgentId>,
        planner: Option<AgentId>,
        judge: Option<AgentId>,
    ) -> Result<Self, ConfigurationError> {
        if debaters.is_empty() {
            return Err(ConfigurationError::EmptyParticipants);
        }

        let mut seen = HashSet::new();
        for id in debaters.iter().chain(planner.iter()).chain(judge.iter()) {
            let name = id.as_str().trim();
            if name.is_empty() {
                return Err(ConfigurationError::EmptyParticipantName);
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigurationError::DuplicateParticipant(name.to_string()));
            }
        }

        if let Some(reserved) = debaters.iter().find(|d| d.is_reserved()) {
            return Err(ConfigurationError::ReservedParticipantName(
                reserved.to_string(),
            ));
        }

        Ok(Self {
            debaters,
            planner,
            judge,
        })
    }

    /// Roster with the default planner and judge names.
    pub fn with_defaults(
        debaters: Vec<AgentId>,
        planner_enabled: bool,
        judge_enabled: bool,
    ) -> Result<Self, ConfigurationError> {
        Self::new(
            debaters,
            planner_enabled.then(AgentId::planner),
            judge_enabled.then(AgentId::judge),
        )
    }

    pub fn debaters(&self) -> &[AgentId] {
        &self.debaters
    }

    pub fn planner(&self) -> Option<&AgentId> {
        self.planner.as_ref()
    }

    pub fn judge(&self) -> Option<&AgentId> {
        self.judge.as_ref()
    }

    pub fn role_of(&self, agent: &AgentId) -> Option<AgentRole> {
        if self.planner.as_ref() == Some(agent) {
            Some(AgentRole::Planner)
        } else if self.judge.as_ref() == Some(agent) {
            Some(AgentRole::Judge)
        } else if self.debaters.contains(agent) {
            Some(AgentRole::Debater)
        } else {
            None
        }
    }

    pub fn phase_plan(&self, round_count: u32) -> PhasePlan {
        PhasePlan {
            has_planner: self.planner.is_some(),
            round_count,
            has_judge: self.judge.is_some(),
        }
    }

    /// All participants: planner first, then debaters, then the judge.
    pub fn all(&self) -> impl Iterator<Item = &AgentId> {
        self.planner
            .iter()
            .chain(self.debaters.iter())
            .chain(self.judge.iter())
    }
}
