//! Output formatter trait

use debate_application::DebateSummary;
use debate_domain::{DebateEvent, DebateRoster, Topic};

/// Renders a live debate for stdout.
pub trait EventFormatter: Send + Sync {
    /// Printed once, before the first event.
    fn format_header(&self, topic: &Topic, roster: &DebateRoster, round_count: u32) -> Option<String>;

    /// One event, as it arrives.
    fn format_event(&self, event: &DebateEvent) -> String;

    /// Printed once the session has ended.
    fn format_summary(&self, summary: &DebateSummary) -> Option<String>;
}

/// One JSON object per event, nothing else.
pub struct JsonlFormatter;

impl EventFormatter for JsonlFormatter {
    fn format_header(&self, _topic: &Topic, _roster: &DebateRoster, _round_count: u32) -> Option<String> {
        None
    }

    fn format_event(&self, event: &DebateEvent) -> String {
        serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_summary(&self, _summary: &DebateSummary) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{AgentId, DebatePhase, DebateSession, SessionId};

    #[test]
    fn test_jsonl_is_one_line_per_event() {
        let roster = DebateRoster::with_defaults(vec![AgentId::new("A")], false, false).unwrap();
        let mut session = DebateSession::new(
            SessionId::new("s"),
            Topic::new("Is tea better than coffee?").unwrap(),
            roster.clone(),
            1,
        )
        .unwrap();
        session.transition(DebatePhase::Round(1)).unwrap();
        session
            .record_message(DebatePhase::Round(1), AgentId::new("A"), "line one\nline two".into(), None)
            .unwrap();

        assert!(JsonlFormatter.format_header(session.topic(), &roster, 1).is_none());
        let line = JsonlFormatter.format_event(&session.transcript()[1]);
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(value["payload"]["content"], "line one\nline two");
    }
}
