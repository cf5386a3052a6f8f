//! Transcript rendering for prompts

use crate::core::agent::AgentId;
use crate::core::string::clip_chars;
use crate::debate::event::DebateEvent;
use crate::debate::roster::DebateRoster;
use crate::debate::transcript::TranscriptEntry;

/// Debater context is clipped to this many characters.
pub const DEBATER_HISTORY_LIMIT: usize = 6000;

/// Render every message and failure marker in transcript order.
pub fn render_history(transcript: &[DebateEvent]) -> String {
    render(transcript, |_| true)
}

/// Render what a debater gets to see: everyone else's turns, without the
/// planner's or the judge's, clipped to [`DEBATER_HISTORY_LIMIT`].
pub fn render_debater_history(
    transcript: &[DebateEvent],
    viewer: &AgentId,
    roster: &DebateRoster,
) -> String {
    let text = render(transcript, |sender| {
        sender != viewer && Some(sender) != roster.planner() && Some(sender) != roster.judge()
    });
    clip_chars(&text, DEBATER_HISTORY_LIMIT).to_string()
}

fn render(transcript: &[DebateEvent], include: impl Fn(&AgentId) -> bool) -> String {
    let mut parts = Vec::new();
    for event in transcript {
        match &event.entry {
            TranscriptEntry::Message(m) if include(&m.sender) => {
                let mut header = format!(
                    "[{}] {} (round {})",
                    m.kind.as_str().to_uppercase(),
                    m.sender,
                    m.round
                );
                if let Some(status) = m.status {
                    header.push_str(&format!(" - status: {}", status.as_str()));
                }
                parts.push(format!("{}:\n{}\n", header, m.content));
            }
            TranscriptEntry::TurnFailure(f) if include(&f.agent) => {
                parts.push(format!(
                    "[FAILED] {} (round {}):\n[{} could not complete this turn: {}]\n",
                    f.agent, f.round, f.agent, f.error
                ));
            }
            _ => {}
        }
    }
    parts.join("\n")
}
