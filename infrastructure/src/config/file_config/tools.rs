//! Tools configuration from TOML (`[tools]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [[tools.backends]]
//! command = "local-stub"          # built-in echo backend, no process
//!
//! [[tools.backends]]
//! name = "search"
//! command = "python"
//! args = ["-u", "search_server.py"]
//! ```
//!
//! An empty list runs in zero-backend mode: every tool request gets the same
//! placeholder result.

use debate_domain::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the in-process echo backend.
pub const LOCAL_STUB_BACKEND: &str = "local-stub";

/// One stdio tool backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileToolBackendConfig {
    /// Backend name used in qualified capability names (defaults to the command)
    #[serde(default)]
    pub name: Option<String>,
    /// Command to start the backend
    pub command: String,
    /// Command arguments
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl FileToolBackendConfig {
    pub fn local_stub() -> Self {
        Self {
            command: LOCAL_STUB_BACKEND.to_string(),
            ..Default::default()
        }
    }

    /// Backend name: explicit name, or the command lower-cased.
    pub fn backend_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.command.trim().to_lowercase())
    }

    pub fn is_local_stub(&self) -> bool {
        self.command.trim().eq_ignore_ascii_case(LOCAL_STUB_BACKEND)
    }
}

/// Raw tools configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub backends: Vec<FileToolBackendConfig>,
}

impl FileToolsConfig {
    /// Reject backend entries that cannot be started or named.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut names = std::collections::HashSet::new();
        for backend in &self.backends {
            if backend.command.trim().is_empty() {
                return Err(ConfigurationError::MalformedBackends(
                    "backend command cannot be empty".to_string(),
                ));
            }
            let name = backend.backend_name();
            if name.contains(':') {
                return Err(ConfigurationError::MalformedBackends(format!(
                    "backend name '{}' cannot contain ':'",
                    name
                )));
            }
            if !names.insert(name.clone()) {
                return Err(ConfigurationError::MalformedBackends(format!(
                    "duplicate backend '{}'",
                    name
                )));
            }
        }
        Ok(())
    }
}
