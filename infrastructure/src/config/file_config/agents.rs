//! Agent configuration from TOML (`[agents.<name>]` sections)
//!
//! Every remote agent speaks OpenAI-compatible chat completions; `base_url`
//! selects the vendor. The default roster (`OpenAI`, `Claude`, `Gemini`)
//! maps to:
//!
//! ```toml
//! [agents.OpenAI]
//! provider = "openai"
//! model = "gpt-4o-mini"
//! api_key_env = "OPENAI_API_KEY"
//! role_hint = "Optimistic technologist"
//!
//! [agents.Claude]
//! provider = "openai"
//! base_url = "https://api.anthropic.com/v1"
//! model = "claude-3-5-haiku-latest"
//! api_key_env = "ANTHROPIC_API_KEY"
//!
//! [agents.Gemini]
//! provider = "openai"
//! base_url = "https://generativelanguage.googleapis.com/v1beta/openai"
//! model = "gemini-2.0-flash"
//! api_key_env = "GEMINI_API_KEY"
//! ```
//!
//! Any other OpenAI-compatible server (a local proxy, vLLM, Ollama) works
//! the same way. Debaters without a section get the placeholder adapter;
//! the planner defaults to the template planner.

use serde::{Deserialize, Serialize};

/// Which adapter backs an agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentProvider {
    /// OpenAI-compatible chat completions endpoint
    OpenAi,
    /// Canned output, no network
    #[default]
    Placeholder,
    /// Deterministic structured plan (planner only)
    Template,
}

/// Raw per-agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub provider: AgentProvider,
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Perspective injected into the agent's prompts
    pub role_hint: Option<String>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            provider: AgentProvider::default(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            role_hint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: FileAgentConfig = toml::from_str(r#"provider = "openai""#).unwrap();
        assert_eq!(config.provider, AgentProvider::OpenAi);
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.role_hint.is_none());
    }

    #[test]
    fn test_vendor_sections_override_endpoint_and_key() {
        let claude: FileAgentConfig = toml::from_str(
            r#"
provider = "openai"
base_url = "https://api.anthropic.com/v1"
model = "claude-3-5-haiku-latest"
api_key_env = "ANTHROPIC_API_KEY"
"#,
        )
        .unwrap();
        assert_eq!(claude.provider, AgentProvider::OpenAi);
        assert_eq!(claude.base_url, "https://api.anthropic.com/v1");
        assert_eq!(claude.api_key_env, "ANTHROPIC_API_KEY");

        let gemini: FileAgentConfig = toml::from_str(
            r#"
provider = "openai"
base_url = "https://generativelanguage.googleapis.com/v1beta/openai"
model = "gemini-2.0-flash"
api_key_env = "GEMINI_API_KEY"
"#,
        )
        .unwrap();
        assert_eq!(gemini.model, "gemini-2.0-flash");
        assert_eq!(gemini.api_key_env, "GEMINI_API_KEY");
        assert!(gemini.role_hint.is_none());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(toml::from_str::<FileAgentConfig>(r#"provider = "carrier-pigeon""#).is_err());
    }
}
