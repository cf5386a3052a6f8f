//! Tool Router port
//!
//! Dispatches a qualified capability name to the backend that owns it.
//! The router enforces no policy: budgets are checked by the caller before
//! anything reaches [`ToolRouter::invoke`].

use async_trait::async_trait;
use debate_domain::{QualifiedCapability, ToolError};
use serde_json::{Value, json};

#[async_trait]
pub trait ToolRouter: Send + Sync {
    /// Capabilities currently available, as `<backend>:<capability>`
    fn capabilities(&self) -> Vec<QualifiedCapability>;

    /// Invoke `capability` (qualified name) with `arguments`.
    async fn invoke(&self, capability: &str, arguments: &Value) -> Result<Value, ToolError>;
}

/// Zero-backend mode: every invocation returns the same placeholder record.
pub struct PlaceholderToolRouter;

impl PlaceholderToolRouter {
    pub fn placeholder_result(capability: &str) -> Value {
        json!({
            "placeholder": true,
            "capability": capability,
            "message": "no tool backends configured",
        })
    }
}

#[async_trait]
impl ToolRouter for PlaceholderToolRouter {
    fn capabilities(&self) -> Vec<QualifiedCapability> {
        Vec::new()
    }

    async fn invoke(&self, capability: &str, _arguments: &Value) -> Result<Value, ToolError> {
        Ok(Self::placeholder_result(capability))
    }
}
