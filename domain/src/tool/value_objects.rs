//! Tool value objects: requests, outcomes and errors
//!
//! A [`ToolRequest`] is what an agent asks for; a [`ToolOutcome`] is what
//! ended up in the transcript. Requests past the per-round ceiling never
//! reach a backend and are recorded as [`ToolOutcome::BudgetExceeded`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned by a tool backend (or by the router before dispatch).
///
/// | Code | Description |
/// |------|-------------|
/// | `NOT_FOUND` | Unknown backend or capability |
/// | `INVALID_ARGUMENT` | Malformed capability name or arguments |
/// | `EXECUTION_FAILED` | Backend reported an error |
/// | `BACKEND_UNAVAILABLE` | Backend process is gone or never started |
/// | `TIMEOUT` | Backend did not answer in time |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(capability: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Unknown capability: {}", capability.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn backend_unavailable(backend: impl Into<String>) -> Self {
        Self::new(
            "BACKEND_UNAVAILABLE",
            format!("Tool backend unavailable: {}", backend.into()),
        )
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// A tool invocation an agent asked for during its turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Qualified name, `<backend>:<capability>`; validated by the router
    pub capability: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolRequest {
    pub fn new(capability: impl Into<String>, arguments: Value) -> Self {
        Self {
            capability: capability.into(),
            arguments,
        }
    }
}

/// How a tool request was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { result: Value },
    Failed { error: ToolError },
    /// Rejected locally; the backend was never called
    BudgetExceeded { ceiling: u32 },
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, ToolOutcome::BudgetExceeded { .. })
    }

    /// Short text form handed back to the agent in its follow-up context.
    pub fn summary(&self) -> String {
        match self {
            ToolOutcome::Success { result } => result.to_string(),
            ToolOutcome::Failed { error } => format!("error: {}", error),
            ToolOutcome::BudgetExceeded { ceiling } => {
                format!("rejected: tool budget of {} calls per round exhausted", ceiling)
            }
        }
    }
}

impl From<Result<Value, ToolError>> for ToolOutcome {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(result) => ToolOutcome::Success { result },
            Err(error) => ToolOutcome::Failed { error },
        }
    }
}
