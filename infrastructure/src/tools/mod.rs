//! Tool backends
//!
//! - [`LocalStubBackend`]: in-process echo, configured as `command = "local-stub"`
//! - [`StdioToolBackend`]: child process speaking newline-delimited JSON-RPC
//! - [`BackendToolRouter`]: the [`ToolRouter`] the orchestrator talks to

pub mod backend;
pub mod error;
pub mod local_stub;
pub mod protocol;
pub mod router;
pub mod stdio;

pub use backend::ToolBackend;
pub use error::ToolBackendError;
pub use local_stub::LocalStubBackend;
pub use router::BackendToolRouter;
pub use stdio::StdioToolBackend;

use crate::config::FileToolBackendConfig;
use debate_application::{PlaceholderToolRouter, ToolRouter};
use std::sync::Arc;

/// Started backends plus the router handed to the orchestrator.
///
/// With no configured backends (or none that started) the orchestrator gets
/// the [`PlaceholderToolRouter`].
pub struct ToolStack {
    backends: Option<Arc<BackendToolRouter>>,
    router: Arc<dyn ToolRouter>,
}

impl ToolStack {
    pub async fn start(configs: &[FileToolBackendConfig]) -> Self {
        if configs.is_empty() {
            return Self::placeholder();
        }
        let started = BackendToolRouter::start(configs).await;
        if started.is_empty() {
            return Self::placeholder();
        }
        let started = Arc::new(started);
        Self {
            router: started.clone(),
            backends: Some(started),
        }
    }

    fn placeholder() -> Self {
        Self {
            backends: None,
            router: Arc::new(PlaceholderToolRouter),
        }
    }

    pub fn router(&self) -> Arc<dyn ToolRouter> {
        self.router.clone()
    }

    pub fn backend_names(&self) -> Vec<String> {
        self.backends
            .as_ref()
            .map(|b| b.backend_names())
            .unwrap_or_default()
    }

    pub async fn shutdown(&self) {
        if let Some(backends) = &self.backends {
            backends.shutdown().await;
        }
    }
}
