//! Progress reporting for debate execution

use colored::Colorize;
use debate_application::DebateProgressNotifier;
use debate_domain::{AgentId, DebatePhase, ToolOutcome};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a debate with one bar per speaking phase.
///
/// Bars are drawn on stderr. Anything written to stdout while a bar is
/// visible should go through [`ProgressReporter::suspend`].
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// Hide the bars while `f` writes to the terminal.
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.multi.suspend(f)
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.phase_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &DebatePhase, total_turns: usize) {
        let pb = self.multi.add(ProgressBar::new(total_turns as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name());
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.phase_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_turn_complete(&self, _phase: &DebatePhase, agent: &AgentId, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {}", "v".green(), agent)
            } else {
                format!("{} {}", "x".red(), agent)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_phase_complete(&self, phase: &DebatePhase) {
        let finished = self.phase_bar.lock().ok().and_then(|mut guard| guard.take());
        if let Some(pb) = finished {
            pb.finish_with_message(format!("{} complete", phase.display_name().green()));
        }
    }

    fn on_tool_call(&self, agent: &AgentId, capability: &str, outcome: &ToolOutcome) {
        self.with_bar(|pb| {
            let mark = if outcome.is_success() { "v".green() } else { "x".red() };
            pb.set_message(format!("{} {} {}", mark, agent, capability.dimmed()));
        });
    }

    fn on_finished(&self, _phase: &DebatePhase) {
        if let Ok(mut guard) = self.phase_bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.abandon();
        }
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &DebatePhase, total_turns: usize) {
        eprintln!(
            "{} {} ({} turns)",
            "->".cyan(),
            phase.display_name().bold(),
            total_turns
        );
    }

    fn on_turn_complete(&self, _phase: &DebatePhase, agent: &AgentId, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), agent);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), agent);
        }
    }

    fn on_phase_complete(&self, _phase: &DebatePhase) {}

    fn on_finished(&self, phase: &DebatePhase) {
        eprintln!("{} {}", "->".cyan(), phase.display_name().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    #[test]
    fn test_reporter_tracks_one_bar_per_phase() {
        let reporter = ProgressReporter::new();
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());

        reporter.on_phase_start(&DebatePhase::Round(1), 2);
        reporter.on_turn_complete(&DebatePhase::Round(1), &AgentId::new("A"), true);
        reporter.on_turn_complete(&DebatePhase::Round(1), &AgentId::new("B"), false);
        reporter.with_bar(|pb| assert_eq!(pb.position(), 2));

        reporter.on_phase_complete(&DebatePhase::Round(1));
        assert!(reporter.phase_bar.lock().unwrap().is_none());

        // Callbacks without an open bar are ignored
        reporter.on_turn_complete(&DebatePhase::Judgment, &AgentId::judge(), true);
        reporter.on_finished(&DebatePhase::Completed);
        assert_eq!(reporter.suspend(|| 7), 7);
    }
}
