//! `local-stub`: in-process echo backend, no child process.

use super::backend::ToolBackend;
use crate::config::LOCAL_STUB_BACKEND;
use async_trait::async_trait;
use debate_domain::ToolError;
use serde_json::{Value, json};

pub struct LocalStubBackend;

impl LocalStubBackend {
    pub const ECHO: &'static str = "echo";
}

#[async_trait]
impl ToolBackend for LocalStubBackend {
    fn name(&self) -> &str {
        LOCAL_STUB_BACKEND
    }

    fn tools(&self) -> Vec<String> {
        vec![Self::ECHO.to_string()]
    }

    async fn call(&self, tool: &str, arguments: &Value) -> Result<Value, ToolError> {
        if tool != Self::ECHO {
            return Err(ToolError::not_found(format!("{}:{}", LOCAL_STUB_BACKEND, tool)));
        }
        let text = ["text", "q"]
            .iter()
            .find_map(|key| arguments.get(*key).and_then(Value::as_str))
            .unwrap_or_default();
        Ok(json!({
            "message": "Echo (local-stub) active",
            "echo": text,
            "args": arguments,
        }))
    }
}
