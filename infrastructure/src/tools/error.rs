//! Error types for tool backends

use debate_domain::ToolError;
use thiserror::Error;

/// Result type alias for tool backend operations
pub type Result<T> = std::result::Result<T, ToolBackendError>;

/// Errors that can occur when talking to a tool backend process
#[derive(Error, Debug)]
pub enum ToolBackendError {
    #[error("Failed to spawn tool backend: {0}")]
    SpawnError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("JSON-RPC error (code {code}): {message}")]
    RpcError { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Transport closed")]
    TransportClosed,

    #[error("Request timeout")]
    Timeout,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl From<ToolBackendError> for ToolError {
    fn from(error: ToolBackendError) -> Self {
        match error {
            ToolBackendError::UnknownTool(name) => ToolError::not_found(name),
            ToolBackendError::Timeout => ToolError::timeout("tool backend did not answer in time"),
            ToolBackendError::TransportClosed | ToolBackendError::SpawnError(_) => {
                ToolError::backend_unavailable(error.to_string())
            }
            other => ToolError::execution_failed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_tool_error_codes() {
        assert_eq!(ToolError::from(ToolBackendError::UnknownTool("x".into())).code, "NOT_FOUND");
        assert_eq!(ToolError::from(ToolBackendError::Timeout).code, "TIMEOUT");
        assert_eq!(
            ToolError::from(ToolBackendError::TransportClosed).code,
            "BACKEND_UNAVAILABLE"
        );
        assert_eq!(
            ToolError::from(ToolBackendError::RpcError {
                code: -32601,
                message: "Method not found".into()
            })
            .code,
            "EXECUTION_FAILED"
        );
    }
}
