//! Infrastructure layer for model-debate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod agents;
pub mod config;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use agents::{
    OpenAiCompatibleAdapter, PlaceholderAdapter, RoutingAgentAdapter, TemplatePlannerAdapter,
};
pub use config::{
    AgentProvider, ConfigLoadError, ConfigLoader, FileAgentConfig, FileConfig, FileDebateConfig,
    FileOutputConfig, FileOutputFormat, FileToolBackendConfig, FileToolsConfig,
};
pub use logging::{JsonlTranscriptStore, JsonlTranscriptWriter};
pub use tools::{
    BackendToolRouter, LocalStubBackend, StdioToolBackend, ToolBackend, ToolBackendError,
    ToolStack,
};
