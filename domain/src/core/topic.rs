//! Topic value object

use super::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Placeholder texts left over from templates, rejected as topics.
const PLACEHOLDER_TOPICS: &[&str] = &["your topic here", "topic here"];

/// The proposition under debate (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Create a validated topic.
    ///
    /// Empty, whitespace-only and template placeholder topics are rejected.
    pub fn new(content: impl Into<String>) -> Result<Self, ConfigurationError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::InvalidTopic(
                "topic cannot be empty".to_string(),
            ));
        }
        if PLACEHOLDER_TOPICS.contains(&trimmed.to_lowercase().as_str()) {
            return Err(ConfigurationError::InvalidTopic(format!(
                "'{}' is a placeholder, please provide a real topic",
                trimmed
            )));
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_is_trimmed() {
        let topic = Topic::new("  Will Rust replace C++?  ").unwrap();
        assert_eq!(topic.content(), "Will Rust replace C++?");
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert!(Topic::new("").is_err());
        assert!(Topic::new("   ").is_err());
    }

    #[test]
    fn test_placeholder_topic_rejected() {
        assert!(matches!(
            Topic::new("Your topic here"),
            Err(ConfigurationError::InvalidTopic(_))
        ));
    }
}
