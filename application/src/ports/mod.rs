//! Ports (interfaces) for the application layer
//!
//! These traits define the boundaries between the application layer
//! and the outside world (infrastructure, presentation).

pub mod agent_adapter;
pub mod progress;
pub mod tool_router;
pub mod transcript_logger;
