//! Progress notification port
//!
//! Defines the interface for reporting progress while a debate runs.

use debate_domain::{AgentId, DebatePhase, ToolOutcome};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when a speaking phase starts
    fn on_phase_start(&self, phase: &DebatePhase, total_turns: usize);

    /// Called when a turn completes within a phase
    fn on_turn_complete(&self, phase: &DebatePhase, agent: &AgentId, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &DebatePhase);

    /// Called when a tool request has been resolved
    fn on_tool_call(&self, _agent: &AgentId, _capability: &str, _outcome: &ToolOutcome) {}

    /// Called once the session reaches `Completed` or `Failed`
    fn on_finished(&self, _phase: &DebatePhase) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &DebatePhase, _total_turns: usize) {}
    fn on_turn_complete(&self, _phase: &DebatePhase, _agent: &AgentId, _success: bool) {}
    fn on_phase_complete(&self, _phase: &DebatePhase) {}
}
