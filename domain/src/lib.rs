//! Domain layer for model-debate
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! A debate coordinates a fixed roster of agents through phases:
//!
//! - **Planning** (optional): a planner briefs every debater once
//! - **Rounds**: every debater argues, then rebuts, for `R` barriered rounds
//! - **Judgment** (optional): a judge reads the whole transcript and concludes
//!
//! ## Transcript
//!
//! Messages, tool calls, phase changes and turn failures share one
//! session-wide sequence counter. The transcript is the durable record; the
//! event stream is a view of it.

pub mod budget;
pub mod core;
pub mod debate;
pub mod prompt;
pub mod tool;

// Re-export commonly used types
pub use budget::{BudgetTracker, RoundBudget};
pub use core::{
    agent::{AgentId, AgentRole},
    error::{ConfigurationError, DomainError},
    session_id::SessionId,
    topic::Topic,
};
pub use debate::{
    event::DebateEvent,
    message::{DebateMessage, MessageKind, TurnStatus},
    phase::{DebatePhase, PhasePlan},
    roster::DebateRoster,
    routing::recipients_for,
    session::DebateSession,
    transcript::{PhaseChange, ToolCallRecord, TranscriptEntry, TurnFailure},
};
pub use prompt::{DebatePromptTemplate, render_debater_history, render_history};
pub use tool::{
    capability::{QualifiedCapability, preferred_capability},
    value_objects::{ToolError, ToolOutcome, ToolRequest},
};
