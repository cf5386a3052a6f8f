//! Debate phase state machine
//!
//! ```text
//! Idle ──► Planning ──► Round(1) ──► … ──► Round(R) ──► Judgment ──► Completed
//!   │         (optional)                        │        (optional)
//!   └──────────────────────────────────────────────────────────────► Failed
//! ```
//!
//! `Failed` is reachable from every non-terminal phase. Planning is only
//! entered when a planner is configured; Judgment only when a judge is.

use super::message::MessageKind;
use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Shape of a particular debate: which optional phases exist and how many rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePlan {
    pub has_planner: bool,
    pub round_count: u32,
    pub has_judge: bool,
}

/// Lifecycle phase of a debate session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebatePhase {
    Idle,
    Planning,
    /// 1-based round number
    Round(u32),
    Judgment,
    Completed,
    Failed,
}

impl DebatePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DebatePhase::Completed | DebatePhase::Failed)
    }

    /// Kind of message produced by a turn taken in this phase.
    pub fn message_kind(&self) -> Option<MessageKind> {
        match self {
            DebatePhase::Planning => Some(MessageKind::Analysis),
            DebatePhase::Round(1) => Some(MessageKind::Argument),
            DebatePhase::Round(_) => Some(MessageKind::Rebuttal),
            DebatePhase::Judgment => Some(MessageKind::FinalConclusion),
            DebatePhase::Idle | DebatePhase::Completed | DebatePhase::Failed => None,
        }
    }

    /// Round index recorded on entries produced during this phase.
    ///
    /// Planning is −1, rounds are 1..=R, judgment is R. Idle and terminal
    /// phases report `None`; callers keep the last index they saw.
    pub fn round_index(&self, plan: &PhasePlan) -> Option<i32> {
        match self {
            DebatePhase::Planning => Some(-1),
            DebatePhase::Round(i) => Some(*i as i32),
            DebatePhase::Judgment => Some(plan.round_count as i32),
            DebatePhase::Idle | DebatePhase::Completed | DebatePhase::Failed => None,
        }
    }

    /// The successor on the normal path, or `None` from a terminal phase.
    pub fn next(&self, plan: &PhasePlan) -> Option<DebatePhase> {
        let after_rounds = if plan.has_judge {
            DebatePhase::Judgment
        } else {
            DebatePhase::Completed
        };
        match self {
            DebatePhase::Idle if plan.has_planner => Some(DebatePhase::Planning),
            DebatePhase::Idle | DebatePhase::Planning => Some(DebatePhase::Round(1)),
            DebatePhase::Round(i) if *i < plan.round_count => Some(DebatePhase::Round(i + 1)),
            DebatePhase::Round(_) => Some(after_rounds),
            DebatePhase::Judgment => Some(DebatePhase::Completed),
            DebatePhase::Completed | DebatePhase::Failed => None,
        }
    }

    /// Whether `self -> to` is a legal transition under `plan`.
    pub fn can_transition_to(&self, to: DebatePhase, plan: &PhasePlan) -> bool {
        if self.is_terminal() {
            return false;
        }
        if to == DebatePhase::Failed {
            return true;
        }
        self.next(plan) == Some(to)
    }

    /// Validate and perform a transition.
    pub fn transition(&self, to: DebatePhase, plan: &PhasePlan) -> Result<DebatePhase, DomainError> {
        if self.can_transition_to(to, plan) {
            Ok(to)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.label(),
                to: to.label(),
            })
        }
    }

    /// Stable string form used on the wire (`"round-2"`, `"judgment"`, ...).
    pub fn label(&self) -> String {
        match self {
            DebatePhase::Idle => "idle".to_string(),
            DebatePhase::Planning => "planning".to_string(),
            DebatePhase::Round(i) => format!("round-{}", i),
            DebatePhase::Judgment => "judgment".to_string(),
            DebatePhase::Completed => "completed".to_string(),
            DebatePhase::Failed => "failed".to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            DebatePhase::Idle => "Idle".to_string(),
            DebatePhase::Planning => "Planning".to_string(),
            DebatePhase::Round(i) => format!("Round {}", i),
            DebatePhase::Judgment => "Judgment".to_string(),
            DebatePhase::Completed => "Completed".to_string(),
            DebatePhase::Failed => "Failed".to_string(),
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for DebatePhase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidTransition {
            from: s.to_string(),
            to: s.to_string(),
        };
        Ok(match s {
            "idle" => DebatePhase::Idle,
            "planning" => DebatePhase::Planning,
            "judgment" => DebatePhase::Judgment,
            "completed" => DebatePhase::Completed,
            "failed" => DebatePhase::Failed,
            other => {
                let n = other
                    .strip_prefix("round-")
                    .and_then(|n| n.parse::<u32>().ok())
                    .filter(|n| *n >= 1)
                    .ok_or_else(invalid)?;
                DebatePhase::Round(n)
            }
        })
    }
}

impl Serialize for DebatePhase {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for DebatePhase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(has_planner: bool, round_count: u32, has_judge: bool) -> PhasePlan {
        PhasePlan {
            has_planner,
            round_count,
            has_judge,
        }
    }

    fn walk(plan: &PhasePlan) -> Vec<DebatePhase> {
        let mut phases = vec![DebatePhase::Idle];
        while let Some(next) = phases.last().and_then(|p| p.next(plan)) {
            phases.push(next);
        }
        phases
    }

    #[test]
    fn test_full_walk_with_planner_and_judge() {
        assert_eq!(
            walk(&plan(true, 2, true)),
            vec![
                DebatePhase::Idle,
                DebatePhase::Planning,
                DebatePhase::Round(1),
                DebatePhase::Round(2),
                DebatePhase::Judgment,
                DebatePhase::Completed,
            ]
        );
    }

    #[test]
    fn test_walk_without_optional_phases() {
        assert_eq!(
            walk(&plan(false, 1, false)),
            vec![DebatePhase::Idle, DebatePhase::Round(1), DebatePhase::Completed]
        );
    }

    #[test]
    fn test_failed_reachable_from_non_terminal_only() {
        let p = plan(true, 2, true);
        for phase in [
            DebatePhase::Idle,
            DebatePhase::Planning,
            DebatePhase::Round(2),
            DebatePhase::Judgment,
        ] {
            assert!(phase.can_transition_to(DebatePhase::Failed, &p));
        }
        assert!(!DebatePhase::Completed.can_transition_to(DebatePhase::Failed, &p));
        assert!(!DebatePhase::Failed.can_transition_to(DebatePhase::Failed, &p));
    }

    #[test]
    fn test_skipping_a_round_is_rejected() {
        let p = plan(false, 3, true);
        let err = DebatePhase::Round(1)
            .transition(DebatePhase::Round(3), &p)
            .unwrap_err();
        assert!(err.to_string().contains("round-1 -> round-3"));
        assert!(DebatePhase::Round(3).transition(DebatePhase::Judgment, &p).is_ok());
    }

    #[test]
    fn test_message_kinds_per_phase() {
        assert_eq!(DebatePhase::Planning.message_kind(), Some(MessageKind::Analysis));
        assert_eq!(DebatePhase::Round(1).message_kind(), Some(MessageKind::Argument));
        assert_eq!(DebatePhase::Round(4).message_kind(), Some(MessageKind::Rebuttal));
        assert_eq!(
            DebatePhase::Judgment.message_kind(),
            Some(MessageKind::FinalConclusion)
        );
        assert_eq!(DebatePhase::Idle.message_kind(), None);
    }

    #[test]
    fn test_round_indices() {
        let p = plan(true, 3, true);
        assert_eq!(DebatePhase::Planning.round_index(&p), Some(-1));
        assert_eq!(DebatePhase::Round(2).round_index(&p), Some(2));
        assert_eq!(DebatePhase::Judgment.round_index(&p), Some(3));
        assert_eq!(DebatePhase::Completed.round_index(&p), None);
    }

    #[test]
    fn test_label_round_trip() {
        for phase in [
            DebatePhase::Idle,
            DebatePhase::Round(12),
            DebatePhase::Judgment,
            DebatePhase::Failed,
        ] {
            let json = serde_json::to_string(&phase).unwrap();
            let back: DebatePhase = serde_json::from_str(&json).unwrap();
            assert_eq!(back, phase);
        }
        assert!("round-0".parse::<DebatePhase>().is_err());
    }
}
