//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted once into the application
//! [`DebateConfig`].

mod agents;
mod debate;
mod output;
mod tools;

pub use agents::{AgentProvider, FileAgentConfig};
pub use debate::{FileDebateConfig, ParticipantList};
pub use output::{FileOutputConfig, FileOutputFormat};
pub use tools::{FileToolBackendConfig, FileToolsConfig, LOCAL_STUB_BACKEND};

use debate_application::DebateConfig;
use debate_domain::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Orchestration settings
    pub debate: FileDebateConfig,
    /// Tool backends
    pub tools: FileToolsConfig,
    /// Per-agent adapter settings, keyed by agent name
    pub agents: BTreeMap<String, FileAgentConfig>,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the whole file and produce the application config.
    pub fn to_debate_config(&self) -> Result<DebateConfig, ConfigurationError> {
        self.tools.validate()?;
        self.debate.to_debate_config()
    }

    /// Agent section by name, matched case-insensitively.
    pub fn agent(&self, name: &str) -> Option<&FileAgentConfig> {
        self.agents
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, config)| config)
    }
}
