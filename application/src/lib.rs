//! Application layer for model-debate
//!
//! This crate contains the Phase Controller, the message bus, port
//! definitions, and application configuration.
//! It depends only on the domain layer.

pub mod bus;
pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use bus::{EventStream, MessageBus};
pub use config::{DebateConfig, StopPolicy, TurnFailurePolicy};
pub use ports::{
    agent_adapter::{AdapterError, AgentAdapter, AgentReply, ToolExchange, TurnRequest},
    progress::{DebateProgressNotifier, NoProgress},
    tool_router::{PlaceholderToolRouter, ToolRouter},
    transcript_logger::{NoTranscriptLogger, TranscriptLogger, TranscriptStore},
};
pub use use_cases::debate_service::{
    CallerId, DebateService, ServiceError, SessionOverview, StartRequest,
};
pub use use_cases::run_debate::{DebateSummary, RunDebateError, RunDebateUseCase};
