//! Routes qualified capability names to the tool backends that own them.

use super::backend::ToolBackend;
use super::local_stub::LocalStubBackend;
use super::stdio::StdioToolBackend;
use crate::config::FileToolBackendConfig;
use async_trait::async_trait;
use debate_application::ToolRouter;
use debate_domain::{QualifiedCapability, ToolError};
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fixed set of backends, registered once at startup.
#[derive(Default)]
pub struct BackendToolRouter {
    backends: HashMap<String, Arc<dyn ToolBackend>>,
    capabilities: Vec<QualifiedCapability>,
}

impl BackendToolRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a started backend. A later backend with the same name
    /// replaces the earlier one.
    pub fn register(&mut self, backend: Arc<dyn ToolBackend>) {
        let name = backend.name().to_string();
        self.capabilities.retain(|c| c.backend != name);
        self.capabilities.extend(
            backend
                .tools()
                .into_iter()
                .map(|tool| QualifiedCapability::new(name.clone(), tool)),
        );
        self.capabilities.sort();
        self.backends.insert(name, backend);
    }

    /// Start every configured backend. Backends that fail to start are
    /// logged and left out; the debate runs with whatever remains.
    pub async fn start(configs: &[FileToolBackendConfig]) -> Self {
        let mut router = Self::new();
        for config in configs {
            if config.is_local_stub() {
                router.register(Arc::new(LocalStubBackend));
                continue;
            }
            match StdioToolBackend::start(config).await {
                Ok(backend) => router.register(Arc::new(backend)),
                Err(e) => warn!(
                    "Tool backend {} failed to start, skipping: {}",
                    config.backend_name(),
                    e
                ),
            }
        }
        info!(
            "Tool router ready with {} backend(s), {} capabilities",
            router.backends.len(),
            router.capabilities.len()
        );
        router
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn backend_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.backends.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn shutdown(&self) {
        debug!("Shutting down {} tool backend(s)", self.backends.len());
        join_all(self.backends.values().map(|backend| backend.shutdown())).await;
    }
}

#[async_trait]
impl ToolRouter for BackendToolRouter {
    fn capabilities(&self) -> Vec<QualifiedCapability> {
        self.capabilities.clone()
    }

    async fn invoke(&self, capability: &str, arguments: &Value) -> Result<Value, ToolError> {
        let qualified = QualifiedCapability::parse(capability)
            .map_err(|e| ToolError::invalid_argument(e.to_string()))?;
        let backend = self
            .backends
            .get(&qualified.backend)
            .ok_or_else(|| ToolError::not_found(capability))?;
        debug!("Routing {} to backend {}", capability, qualified.backend);
        backend.call(&qualified.name, arguments).await
    }
}
