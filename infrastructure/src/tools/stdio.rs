//! Stdio tool backend: a child process speaking newline-delimited JSON-RPC.
//!
//! Started once per process. The handshake is `initialize`, then the
//! `notifications/initialized` notification, then `tools/list`. Calls are
//! serialized per backend: one request is in flight at a time and the
//! response is matched by `id`, skipping notifications and stale responses.

use super::backend::ToolBackend;
use super::error::{Result, ToolBackendError};
use super::protocol::{
    CallToolResult, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, ListToolsResult,
};
use crate::config::FileToolBackendConfig;
use async_trait::async_trait;
use debate_domain::ToolError;
use serde::Serialize;
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// Bound on a single request/response exchange.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct Channel {
    writer: BufWriter<ChildStdin>,
    reader: BufReader<ChildStdout>,
    line: String,
}

impl Channel {
    async fn send<T: Serialize>(&mut self, message: &T) -> Result<()> {
        let json = serde_json::to_string(message)?;
        trace!("Tool backend <- {}", json);
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read lines until the response to `id` arrives.
    async fn receive(&mut self, id: u64) -> Result<JsonRpcResponse> {
        loop {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line).await?;
            if read == 0 {
                return Err(ToolBackendError::TransportClosed);
            }
            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            trace!("Tool backend -> {}", trimmed);

            let value: Value = match serde_json::from_str(trimmed) {
                Ok(v) => v,
                Err(e) => {
                    debug!("Tool backend: ignoring non-JSON line ({})", e);
                    continue;
                }
            };
            if value.get("method").is_some() {
                trace!("Tool backend: skipping notification/request");
                continue;
            }
            let response: JsonRpcResponse = serde_json::from_value(value)?;
            if response.id == Some(id) {
                return Ok(response);
            }
            debug!("Tool backend: skipping response for id {:?}", response.id);
        }
    }

    async fn request(&mut self, request: JsonRpcRequest) -> Result<Value> {
        let id = request.id;
        self.send(&request).await?;
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.receive(id))
            .await
            .map_err(|_| ToolBackendError::Timeout)??;

        if let Some(error) = response.error {
            return Err(ToolBackendError::RpcError {
                code: error.code,
                message: error.message,
            });
        }
        response
            .result
            .ok_or_else(|| ToolBackendError::UnexpectedResponse("response without result".into()))
    }
}

pub struct StdioToolBackend {
    name: String,
    tools: Vec<String>,
    channel: Mutex<Channel>,
    child: Mutex<Child>,
}

impl StdioToolBackend {
    /// Spawn the backend process and run the handshake.
    pub async fn start(config: &FileToolBackendConfig) -> Result<Self> {
        let name = config.backend_name();
        debug!("Spawning tool backend {}: {} {:?}", name, config.command, config.args);

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = cmd.spawn()?;
        let stdin = child.stdin.take().ok_or_else(|| {
            ToolBackendError::SpawnError(std::io::Error::other("Failed to capture stdin"))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            ToolBackendError::SpawnError(std::io::Error::other("Failed to capture stdout"))
        })?;

        let mut channel = Channel {
            writer: BufWriter::new(stdin),
            reader: BufReader::new(stdout),
            line: String::new(),
        };

        channel.request(JsonRpcRequest::initialize()).await?;
        channel.send(&JsonRpcNotification::initialized()).await?;
        let listed: ListToolsResult =
            serde_json::from_value(channel.request(JsonRpcRequest::list_tools()).await?)?;
        let tools: Vec<String> = listed.tools.into_iter().map(|t| t.name).collect();

        info!("Tool backend {} ready: {:?}", name, tools);
        Ok(Self {
            name,
            tools,
            channel: Mutex::new(channel),
            child: Mutex::new(child),
        })
    }

    async fn call_tool(&self, tool: &str, arguments: &Value) -> Result<Value> {
        if !self.tools.iter().any(|t| t == tool) {
            return Err(ToolBackendError::UnknownTool(format!("{}:{}", self.name, tool)));
        }
        let result = self
            .channel
            .lock()
            .await
            .request(JsonRpcRequest::call_tool(tool, arguments))
            .await?;

        if let Ok(parsed) = serde_json::from_value::<CallToolResult>(result.clone())
            && parsed.is_error
        {
            return Err(ToolBackendError::RpcError {
                code: -1,
                message: parsed.text(),
            });
        }
        Ok(result)
    }
}

#[async_trait]
impl ToolBackend for StdioToolBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn tools(&self) -> Vec<String> {
        self.tools.clone()
    }

    async fn call(&self, tool: &str, arguments: &Value) -> std::result::Result<Value, ToolError> {
        self.call_tool(tool, arguments).await.map_err(|e| {
            warn!("Tool {}:{} failed: {}", self.name, tool, e);
            ToolError::from(e)
        })
    }

    async fn shutdown(&self) {
        let mut child = self.child.lock().await;
        if let Err(e) = child.kill().await {
            debug!("Tool backend {} already gone: {}", self.name, e);
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serde_json::json;

    /// Minimal JSON-RPC backend in POSIX sh: answers by method, echoes ids.
    const SCRIPT: &str = r#"
while IFS= read -r line; do
  id=$(printf '%s' "$line" | sed -n 's/^{"jsonrpc":"2.0","id":\([0-9][0-9]*\).*/\1/p')
  [ -z "$id" ] && continue
  case "$line" in
    *'"method":"initialize"'*)
      printf '{"jsonrpc":"2.0","method":"log","params":{}}\n'
      printf '{"jsonrpc":"2.0","id":%s,"result":{"capabilities":{}}}\n' "$id" ;;
    *'"method":"tools/list"'*)
      printf '{"jsonrpc":"2.0","id":%s,"result":{"tools":[{"name":"search"},{"name":"fail"}]}}\n' "$id" ;;
    *'"name":"fail"'*)
      printf '{"jsonrpc":"2.0","id":%s,"result":{"content":[{"type":"text","text":"no luck"}],"isError":true}}\n' "$id" ;;
    *'"method":"tools/call"'*)
      printf '{"jsonrpc":"2.0","id":%s,"result":{"content":[{"type":"text","text":"found it"}]}}\n' "$id" ;;
  esac
done
"#;

    fn script_backend() -> FileToolBackendConfig {
        FileToolBackendConfig {
            name: Some("shell".to_string()),
            command: "sh".to_string(),
            args: vec!["-c".to_string(), SCRIPT.to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn handshake_lists_tools_and_calls_them() {
        let backend = StdioToolBackend::start(&script_backend()).await.unwrap();
        assert_eq!(backend.name(), "shell");
        assert_eq!(backend.tools(), vec!["search", "fail"]);

        let result = backend.call("search", &json!({"q": "rust"})).await.unwrap();
        assert_eq!(result["content"][0]["text"], "found it");

        let err = backend.call("fail", &json!({})).await.unwrap_err();
        assert_eq!(err.code, "EXECUTION_FAILED");
        assert!(err.message.contains("no luck"));

        let err = backend.call("missing", &json!({})).await.unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");

        backend.shutdown().await;
    }

    #[tokio::test]
    async fn missing_binary_fails_to_start() {
        let config = FileToolBackendConfig {
            command: "definitely-not-a-real-binary-4242".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            StdioToolBackend::start(&config).await,
            Err(ToolBackendError::SpawnError(_))
        ));
    }
}
