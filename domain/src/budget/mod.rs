//! Tool-call budget
//!
//! Each (agent, round) pair gets its own [`RoundBudget`] starting at the
//! ceiling. Budgets are never shared across agents, so a turn can own its
//! budget outright while it runs and hand it back when it is done.

use crate::core::agent::AgentId;
use std::collections::HashMap;

/// Remaining tool invocations for one agent in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundBudget {
    agent: AgentId,
    round: i32,
    ceiling: u32,
    remaining: u32,
}

impl RoundBudget {
    pub fn new(agent: AgentId, round: i32, ceiling: u32) -> Self {
        Self {
            agent,
            round,
            ceiling,
            remaining: ceiling,
        }
    }

    /// Check-and-decrement. Returns `false` once the ceiling is reached;
    /// the counter never goes below zero.
    pub fn reserve(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    pub fn used(&self) -> u32 {
        self.ceiling - self.remaining
    }

    pub fn agent(&self) -> &AgentId {
        &self.agent
    }

    pub fn round(&self) -> i32 {
        self.round
    }
}

/// Per-(agent, round) budgets of one session.
#[derive(Debug, Clone, Default)]
pub struct BudgetTracker {
    ceiling: u32,
    budgets: HashMap<(AgentId, i32), RoundBudget>,
}

impl BudgetTracker {
    pub fn new(ceiling: u32) -> Self {
        Self {
            ceiling,
            budgets: HashMap::new(),
        }
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Reset the (agent, round) budget to the ceiling.
    pub fn reset(&mut self, agent: &AgentId, round: i32) {
        self.budgets.insert(
            (agent.clone(), round),
            RoundBudget::new(agent.clone(), round, self.ceiling),
        );
    }

    /// Check-and-decrement for (agent, round). Not idempotent.
    pub fn reserve(&mut self, agent: &AgentId, round: i32) -> bool {
        let ceiling = self.ceiling;
        self.budgets
            .entry((agent.clone(), round))
            .or_insert_with(|| RoundBudget::new(agent.clone(), round, ceiling))
            .reserve()
    }

    /// Remaining invocations without reserving.
    pub fn peek(&self, agent: &AgentId, round: i32) -> u32 {
        self.budgets
            .get(&(agent.clone(), round))
            .map(RoundBudget::remaining)
            .unwrap_or(self.ceiling)
    }

    /// Take the (agent, round) budget out, resetting it first, so a turn can
    /// own it while it runs.
    pub fn open(&mut self, agent: &AgentId, round: i32) -> RoundBudget {
        self.budgets.remove(&(agent.clone(), round));
        RoundBudget::new(agent.clone(), round, self.ceiling)
    }

    /// Return a budget taken with [`open`](Self::open).
    pub fn close(&mut self, budget: RoundBudget) {
        self.budgets
            .insert((budget.agent.clone(), budget.round), budget);
    }

    /// Drop all budgets of a finished round.
    pub fn end_round(&mut self, round: i32) {
        self.budgets.retain(|(_, r), _| *r != round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_stops_at_ceiling() {
        let mut budget = RoundBudget::new(AgentId::new("A"), 1, 2);
        assert!(budget.reserve());
        assert!(budget.reserve());
        assert!(!budget.reserve());
        assert!(!budget.reserve());
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.used(), 2);
    }

    #[test]
    fn test_zero_ceiling_never_reserves() {
        let mut tracker = BudgetTracker::new(0);
        assert!(!tracker.reserve(&AgentId::new("A"), 1));
        assert_eq!(tracker.peek(&AgentId::new("A"), 1), 0);
    }

    #[test]
    fn test_budgets_are_per_agent_and_round() {
        let a = AgentId::new("A");
        let b = AgentId::new("B");
        let mut tracker = BudgetTracker::new(1);
        assert!(tracker.reserve(&a, 1));
        assert!(!tracker.reserve(&a, 1));
        assert!(tracker.reserve(&b, 1));
        assert!(tracker.reserve(&a, 2));
        assert_eq!(tracker.peek(&a, 1), 0);
        assert_eq!(tracker.peek(&a, 3), 1);
    }

    #[test]
    fn test_reset_restores_ceiling() {
        let a = AgentId::new("A");
        let mut tracker = BudgetTracker::new(2);
        tracker.reserve(&a, 1);
        tracker.reserve(&a, 1);
        tracker.reset(&a, 1);
        assert_eq!(tracker.peek(&a, 1), 2);
    }

    #[test]
    fn test_open_close_round_trip() {
        let a = AgentId::new("A");
        let mut tracker = BudgetTracker::new(3);
        let mut budget = tracker.open(&a, 1);
        budget.reserve();
        tracker.close(budget);
        assert_eq!(tracker.peek(&a, 1), 2);
        tracker.end_round(1);
        assert_eq!(tracker.peek(&a, 1), 3);
    }
}
