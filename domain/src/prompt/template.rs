//! Prompt templates for each debate role

/// Framing shared by every model-backed prompt.
const RESEARCH_PREFIX: &str = r#"You are participating in a multi-party discussion strictly for research and educational purposes.
Provide neutral, source-driven analysis, state assumptions and include uncertainties.
Avoid personal, actionable recommendations; keep the framing general and research-oriented.
"#;

const NO_ROLE_HINT: &str = "(no specific role provided)";

/// Templates for generating prompts at each phase
pub struct DebatePromptTemplate;

impl DebatePromptTemplate {
    /// Prompt for a model-backed planner.
    pub fn planning(agent_name: &str, topic: &str, debaters: &[String]) -> String {
        format!(
            r#"{prefix}
You are {agent_name}, the planner of a structured debate. You do not debate yourself.
Topic: "{topic}"
Debaters: {debaters}

STRICT OUTPUT FORMAT (do not add any text before this line):
Start your first line with EXACTLY:
This is my analysis:

Then produce a debate plan with:
- **Key Terms:** definitions the debaters must agree on
- **Perspectives:** one distinct, contrasting perspective per debater
- **Evidence Requirements:** what counts as support, with inline markers [CITATION: Source, Year, Note]
- **Risks:** common pitfalls to avoid
"#,
            prefix = RESEARCH_PREFIX,
            agent_name = agent_name,
            topic = topic,
            debaters = debaters.join(", "),
        )
    }

    /// Prompt for a debater's turn in round `round`.
    pub fn debate_round(
        agent_name: &str,
        topic: &str,
        round: u32,
        role_hint: Option<&str>,
        history: &str,
    ) -> String {
        let history = if history.trim().is_empty() {
            "(no arguments from other participants yet)"
        } else {
            history
        };
        format!(
            r#"{prefix}
You are {agent_name}. Debate Round {round}.
Topic: "{topic}"

Your assigned role/perspective: {role_hint}

Context so far (others' arguments; do not repeat them verbatim):
{history}

STRICT OUTPUT FORMAT (do not add any text before this line):
Start your first line with EXACTLY:
This is my round-{round}:

Then write 2-4 short paragraphs following this contract:
- Stay consistent with the stance you have taken so far and with your role.
- If you truly change stance due to strong new evidence, you MUST start your first
  paragraph with: **STANCE CHANGE:** <new stance> and include at least one recent,
  specific citation inline (format: [CITATION: Source, Year, Title/Note]).
- When asserting facts, include at least one concrete, recent citation.

Your tasks:
1) Address the most important points from each opponent.
2) Defend or (if justified) revise your stance per the output contract.
"#,
            prefix = RESEARCH_PREFIX,
            agent_name = agent_name,
            round = round,
            topic = topic,
            role_hint = role_hint.unwrap_or(NO_ROLE_HINT),
            history = history,
        )
    }

    /// Prompt for the judge, given the full rendered transcript.
    pub fn judgment(topic: &str, transcript: &str) -> String {
        format!(
            r#"{prefix}
You are the neutral Judge for this research debate on: "{topic}".
Produce a single, self-contained final conclusion based only on the transcript below.

Structure your conclusion as follows:
1) Strongest shared ground (2-4 sentences).
2) Remaining disagreements, briefly.
3) A balanced, practical conclusion with a confidence score (0.0 to 1.0), a short
   justification of the score and explicit caveats.
4) Evaluation of evidence: quality and recency of cited sources, whether claims were
   supported, any flagged (**STANCE CHANGE:**) or unflagged shifts in stance, and which
   participant presented the most credible case.

Rules: base your judgment solely on the transcript and remain strictly neutral.

--- Transcript Start ---
{transcript}
--- Transcript End ---
"#,
            prefix = RESEARCH_PREFIX,
            topic = topic,
            transcript = transcript,
        )
    }

    /// Follow-up appended after the agent's tool requests were resolved.
    pub fn tool_results(results: &[(String, String)]) -> String {
        let mut prompt = String::from("Results of the tool calls you requested:\n");
        for (capability, summary) in results {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", capability, summary));
        }
        prompt.push_str("\nUse these results in your answer. Do not request the same calls again.");
        prompt
    }

    /// Deterministic debate plan used by the template planner.
    pub fn structured_plan(topic: &str) -> String {
        format!(
            r#"Structured Debate Plan

Topic
- {topic}

1) Rounds & Turn Order (orchestrator-controlled)
- Total rounds: use the run's configured value.
- Turn order: use the orchestrator's configured order each round.
- If rounds are barriered, all agents respond to the same prior transcript; otherwise turns run independently.

2) Role / Perspective Assignments
- Each agent adopts a distinct, contrasting perspective (e.g., optimistic futurist, cautious pragmatist, policy/ops skeptic).
- Agents must keep a stable stance across rounds. If a stance changes, the message MUST begin with:
  **STANCE CHANGE:** <new stance> and include at least one recent citation justifying the change.

3) Evidence Requirements (per round, per agent)
- Provide at least one recent source when asserting facts.
- Acceptable types: industry research, peer-reviewed or technical reports, case studies, benchmarks, or survey data.
- Embed citations inline using a consistent marker, e.g., [CITATION: Source, Year, Title/Note].
- Tool usage (if available) should prioritize retrieving up-to-date evidence rather than generic summaries.

4) Key Term Definitions (to be established early)
- Agents should explicitly define any ambiguous or critical terms in the topic.
- Agree (or note disagreements) on metrics and thresholds so comparisons remain coherent across rounds.

5) Minimal Tool Strategy (if tools are available)
- Early rounds: pull trend, benchmark or context data.
- Mid rounds: seek counter-evidence or independent validation of contested claims.
- Late rounds: verify figures or timelines cited during rebuttals.

6) Risks & Safeguards
- Common pitfalls: vague or dated claims, circular logic, ignoring opposing points, undefined metrics.
- Safeguards: require specificity, favor quantifiable evidence, call out weak sources, surface uncertainties.

Planner Notes
- The Planner does not debate; it sets rules and nudges toward evidence-based discussion.
- The Judge must weight arguments by evidence density and recency, discount unsupported claims, and note any stance changes.
"#,
            topic = topic
        )
    }
}
