//! Console output formatter for debate events

use crate::output::formatter::EventFormatter;
use colored::Colorize;
use debate_application::DebateSummary;
use debate_domain::{
    DebateEvent, DebatePhase, DebateRoster, ToolOutcome, Topic, TranscriptEntry, TurnStatus,
};

/// Formats debate events for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Roster and topic, printed before the first event.
    pub fn header(topic: &Topic, roster: &DebateRoster, round_count: u32) -> String {
        let mut output = String::new();
        output.push_str(&Self::banner("Model Debate"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), topic));
        output.push_str(&format!(
            "{} {}\n",
            "Debaters:".cyan().bold(),
            roster
                .debaters()
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        if let Some(planner) = roster.planner() {
            output.push_str(&format!("{} {}\n", "Planner:".cyan().bold(), planner));
        }
        if let Some(judge) = roster.judge() {
            output.push_str(&format!("{} {}\n", "Judge:".cyan().bold(), judge));
        }
        output.push_str(&format!("{} {}\n", "Rounds:".cyan().bold(), round_count));
        output
    }

    pub fn event(event: &DebateEvent) -> String {
        match &event.entry {
            TranscriptEntry::PhaseChange(change) => match change.to {
                DebatePhase::Completed => format!(
                    "\n{}\n",
                    format!("== Debate completed (#{}) ==", change.sequence)
                        .green()
                        .bold()
                ),
                DebatePhase::Failed => format!(
                    "\n{}\n",
                    format!("== Debate failed (#{}) ==", change.sequence)
                        .red()
                        .bold()
                ),
                phase => Self::section_header(&phase.display_name()),
            },
            TranscriptEntry::Message(message) => {
                let recipients = if message.to.is_empty() {
                    String::new()
                } else {
                    format!(
                        " -> {}",
                        message
                            .to
                            .iter()
                            .map(|r| r.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                };
                let status = match message.status {
                    Some(TurnStatus::Reading) => format!(" [{}]", "reading".dimmed()),
                    _ => String::new(),
                };
                format!(
                    "\n{} {}{}{}\n{}\n",
                    format!("#{}", message.sequence).dimmed(),
                    format!("── {} ({}) ──", message.sender, message.kind)
                        .yellow()
                        .bold(),
                    recipients.dimmed(),
                    status,
                    Self::indent(&message.content, "  ")
                )
            }
            TranscriptEntry::ToolCall(call) => {
                let outcome = match &call.outcome {
                    ToolOutcome::Success { .. } => "ok".green(),
                    ToolOutcome::Failed { error } => format!("failed: {}", error).red(),
                    ToolOutcome::BudgetExceeded { ceiling } => {
                        format!("rejected: budget of {} exhausted", ceiling).yellow()
                    }
                };
                format!(
                    "{} {} {} {} {}",
                    format!("#{}", call.sequence).dimmed(),
                    "tool".cyan(),
                    call.agent,
                    call.capability.bold(),
                    outcome
                )
            }
            TranscriptEntry::TurnFailure(failure) => format!(
                "\n{} {}\n",
                format!("#{}", failure.sequence).dimmed(),
                format!("x {} failed its turn: {}", failure.agent, failure.error).red()
            ),
        }
    }

    pub fn summary(summary: &DebateSummary) -> String {
        let outcome = if summary.stopped {
            "stopped".yellow()
        } else if summary.final_phase == DebatePhase::Completed {
            "completed".green()
        } else {
            "failed".red()
        };
        format!(
            "{} {} | {} messages, {} tool calls, {} failed turns, {} events\n{}",
            "Session:".cyan().bold(),
            outcome,
            summary.messages,
            summary.tool_calls,
            summary.failures,
            summary.events,
            Self::footer()
        )
    }

    fn banner(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl EventFormatter for ConsoleFormatter {
    fn format_header(&self, topic: &Topic, roster: &DebateRoster, round_count: u32) -> Option<String> {
        Some(Self::header(topic, roster, round_count))
    }

    fn format_event(&self, event: &DebateEvent) -> String {
        Self::event(event)
    }

    fn format_summary(&self, summary: &DebateSummary) -> Option<String> {
        Some(Self::summary(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{AgentId, DebateSession, SessionId, ToolError};
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    fn session() -> DebateSession {
        let roster =
            DebateRoster::with_defaults(vec![AgentId::new("A"), AgentId::new("B")], false, true)
                .unwrap();
        let mut session = DebateSession::new(
            SessionId::new("s"),
            Topic::new("Is tea better than coffee?").unwrap(),
            roster,
            1,
        )
        .unwrap();
        session.transition(DebatePhase::Round(1)).unwrap();
        session
            .record_tool_call(
                DebatePhase::Round(1),
                AgentId::new("A"),
                "web:search".into(),
                json!({"q": "tea"}),
                ToolOutcome::Failed {
                    error: ToolError::timeout("search"),
                },
            )
            .unwrap();
        session
            .record_message(DebatePhase::Round(1), AgentId::new("A"), "Tea.\nAlways.".into(), None)
            .unwrap();
        session
            .record_failure(DebatePhase::Round(1), AgentId::new("B"), "Request failed: boom".into())
            .unwrap();
        session
    }

    #[test]
    fn test_header_lists_roster_and_topic() {
        plain();
        let s = session();
        let header = ConsoleFormatter::header(s.topic(), s.roster(), 1);
        assert!(header.contains("Topic: Is tea better than coffee?"));
        assert!(header.contains("Debaters: A, B"));
        assert!(header.contains("Judge: Judge"));
        assert!(!header.contains("Planner:"));
    }

    #[test]
    fn test_events_render_by_type() {
        plain();
        let s = session();
        let lines: Vec<String> = s.transcript().iter().map(ConsoleFormatter::event).collect();
        assert!(lines[0].contains("Round 1"));
        assert!(lines[1].contains("web:search"));
        assert!(lines[1].contains("failed: [TIMEOUT]"));
        assert!(lines[2].contains("── A (argument) ──"));
        assert!(lines[2].contains("-> B"));
        assert!(lines[2].contains("  Tea.\n  Always."));
        assert!(lines[3].contains("B failed its turn"));
    }
}
