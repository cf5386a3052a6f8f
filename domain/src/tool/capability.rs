//! Qualified capability names (`<backend>:<capability>`)

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A capability exposed by a named tool backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedCapability {
    pub backend: String,
    pub name: String,
}

impl QualifiedCapability {
    pub fn new(backend: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            name: name.into(),
        }
    }

    /// Parse `backend:capability`.
    ///
    /// The backend part is everything before the *last* colon, so backend
    /// names may contain colons themselves (e.g. `npx:server:search`).
    pub fn parse(qualified: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidCapability(qualified.to_string());
        let (backend, name) = qualified.trim().rsplit_once(':').ok_or_else(invalid)?;
        if backend.is_empty() || name.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(backend, name))
    }

    pub fn qualified(&self) -> String {
        format!("{}:{}", self.backend, self.name)
    }
}

impl std::fmt::Display for QualifiedCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.backend, self.name)
    }
}

impl std::str::FromStr for QualifiedCapability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Pick the capability a built-in adapter should use: search-like first,
/// then echo, then whatever comes first.
pub fn preferred_capability(available: &[QualifiedCapability]) -> Option<&QualifiedCapability> {
    let find = |needle: &str| {
        available
            .iter()
            .find(|c| c.qualified().to_lowercase().contains(needle))
    };
    find("search").or_else(|| find("echo")).or_else(|| available.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let cap = QualifiedCapability::parse("local-stub:echo").unwrap();
        assert_eq!(cap.backend, "local-stub");
        assert_eq!(cap.name, "echo");
        assert_eq!(cap.to_string(), "local-stub:echo");
    }

    #[test]
    fn test_parse_backend_with_colon() {
        let cap: QualifiedCapability = "npx:web:search".parse().unwrap();
        assert_eq!(cap.backend, "npx:web");
        assert_eq!(cap.name, "search");
    }

    #[test]
    fn test_parse_rejects_unqualified() {
        assert!(QualifiedCapability::parse("echo").is_err());
        assert!(QualifiedCapability::parse(":echo").is_err());
        assert!(QualifiedCapability::parse("stub:").is_err());
    }

    #[test]
    fn test_preferred_capability_order() {
        let caps = vec![
            QualifiedCapability::new("files", "read"),
            QualifiedCapability::new("local-stub", "echo"),
            QualifiedCapability::new("web", "search"),
        ];
        assert_eq!(preferred_capability(&caps).unwrap().name, "search");
        assert_eq!(preferred_capability(&caps[..2]).unwrap().name, "echo");
        assert_eq!(preferred_capability(&caps[..1]).unwrap().name, "read");
        assert!(preferred_capability(&[]).is_none());
    }
}
