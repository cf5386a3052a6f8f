//! Recipient computation for published messages

use super::phase::DebatePhase;
use super::roster::DebateRoster;
use crate::core::agent::AgentId;

/// Recipients of a message sent by `sender` during `phase`.
///
/// - planning: every debater
/// - rounds: every debater except the sender (planner and judge never receive)
/// - judgment and non-speaking phases: nobody
///
/// The sender is never among the recipients.
pub fn recipients_for(phase: &DebatePhase, sender: &AgentId, roster: &DebateRoster) -> Vec<AgentId> {
    match phase {
        DebatePhase::Planning | DebatePhase::Round(_) => roster
            .debaters()
            .iter()
            .filter(|d| *d != sender)
            .cloned()
            .collect(),
        DebatePhase::Judgment
        | DebatePhase::Idle
        | DebatePhase::Completed
        | DebatePhase::Failed => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> DebateRoster {
        DebateRoster::with_defaults(
            vec![AgentId::new("A"), AgentId::new("B"), AgentId::new("C")],
            true,
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_round_recipients_exclude_sender() {
        let to = recipients_for(&DebatePhase::Round(2), &AgentId::new("B"), &roster());
        assert_eq!(to, vec![AgentId::new("A"), AgentId::new("C")]);
    }

    #[test]
    fn test_planning_recipients_are_all_debaters() {
        let to = recipients_for(&DebatePhase::Planning, &AgentId::planner(), &roster());
        assert_eq!(to.len(), 3);
        assert!(!to.contains(&AgentId::planner()));
    }

    #[test]
    fn test_judgment_has_no_recipients() {
        assert!(recipients_for(&DebatePhase::Judgment, &AgentId::judge(), &roster()).is_empty());
    }

    #[test]
    fn test_single_debater_round_has_no_recipients() {
        let solo = DebateRoster::with_defaults(vec![AgentId::new("A")], false, false).unwrap();
        assert!(recipients_for(&DebatePhase::Round(1), &AgentId::new("A"), &solo).is_empty());
    }
}
