//! Tool backend abstraction
//!
//! A backend owns a set of named tools. The [`BackendToolRouter`](super::BackendToolRouter)
//! registers each tool as `<backend>:<tool>` and routes invocations here.

use async_trait::async_trait;
use debate_domain::ToolError;
use serde_json::Value;

#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// Name used as the qualifier in capability names
    fn name(&self) -> &str;

    /// Tools discovered at startup
    fn tools(&self) -> Vec<String>;

    /// Call an unqualified tool name.
    async fn call(&self, tool: &str, arguments: &Value) -> Result<Value, ToolError>;

    /// Release whatever the backend holds (child process, sockets).
    async fn shutdown(&self) {}
}
