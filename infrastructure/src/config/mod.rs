//! Configuration file loading for model-debate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DEBATE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./debate.toml` or `./.debate.toml`
//! 4. Global: `~/.config/model-debate/config.toml`
//! 5. Default values
//!
//! CLI flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    AgentProvider, FileAgentConfig, FileConfig, FileDebateConfig, FileOutputConfig,
    FileOutputFormat, FileToolBackendConfig, FileToolsConfig, LOCAL_STUB_BACKEND,
    ParticipantList,
};
pub use loader::{ConfigLoadError, ConfigLoader};
