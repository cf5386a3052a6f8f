//! OpenAI-compatible chat completions adapter.
//!
//! Sends the rendered role prompt as a single user message. Available tool
//! capabilities are offered as functions named `<backend>__<capability>`;
//! function calls in the reply become [`ToolRequest`]s. Transient failures
//! (transport errors, 429, 5xx) are retried with exponential backoff.

use async_trait::async_trait;
use debate_application::{AdapterError, AgentAdapter, AgentReply, TurnRequest};
use debate_domain::{QualifiedCapability, ToolRequest, TurnStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(8);

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<FunctionTool>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct FunctionTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionSpec,
}

#[derive(Debug, Serialize)]
struct FunctionSpec {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ResponseToolCall>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

/// Outcome of one HTTP attempt.
enum AttemptError {
    Transient(AdapterError),
    Fatal(AdapterError),
}

/// Function name for a capability: `:` is not allowed in function names.
fn function_name(capability: &QualifiedCapability) -> String {
    format!("{}__{}", capability.backend, capability.name)
}

pub struct OpenAiCompatibleAdapter {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    role_hint: Option<String>,
    initial_backoff: Duration,
}

impl OpenAiCompatibleAdapter {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
            role_hint: None,
            initial_backoff: INITIAL_BACKOFF,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_role_hint(mut self, role_hint: Option<String>) -> Self {
        self.role_hint = role_hint;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &TurnRequest) -> ChatRequest {
        let tools = if request.remaining_budget > 0 && request.tool_results.is_empty() {
            request
                .capabilities
                .iter()
                .map(|capability| FunctionTool {
                    kind: "function",
                    function: FunctionSpec {
                        name: function_name(capability),
                        description: format!("Call tool {}", capability),
                        parameters: json!({ "type": "object", "additionalProperties": true }),
                    },
                })
                .collect()
        } else {
            Vec::new()
        };

        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: request.render_prompt(self.role_hint.as_deref()),
            }],
            tools,
        }
    }

    fn parse_reply(
        response: ChatResponse,
        capabilities: &[QualifiedCapability],
    ) -> Result<AgentReply, AdapterError> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AdapterError::InvalidResponse("no choices in response".to_string()))?
            .message;

        let by_function: HashMap<String, &QualifiedCapability> = capabilities
            .iter()
            .map(|c| (function_name(c), c))
            .collect();

        let tool_requests: Vec<ToolRequest> = message
            .tool_calls
            .into_iter()
            .map(|call| {
                let capability = by_function
                    .get(&call.function.name)
                    .map(|c| c.qualified())
                    .unwrap_or_else(|| call.function.name.replacen("__", ":", 1));
                let arguments = serde_json::from_str(&call.function.arguments)
                    .unwrap_or_else(|_| json!({}));
                ToolRequest::new(capability, arguments)
            })
            .collect();

        let content = message.content.unwrap_or_default().trim().to_string();
        let reply = AgentReply::text(content).with_tool_requests(tool_requests);
        Ok(if reply.tool_requests.is_empty() {
            reply.with_status(TurnStatus::Complete)
        } else {
            reply
        })
    }

    async fn send_once(&self, body: &ChatRequest) -> Result<ChatResponse, AttemptError> {
        let mut http = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(body);
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }

        let response = http
            .send()
            .await
            .map_err(|e| AttemptError::Transient(AdapterError::Unavailable(e.to_string())))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<ChatResponse>().await.map_err(|e| {
                AttemptError::Fatal(AdapterError::InvalidResponse(e.to_string()))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let error = AdapterError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), body));
        if status.as_u16() == 429 || status.is_server_error() {
            Err(AttemptError::Transient(error))
        } else {
            Err(AttemptError::Fatal(error))
        }
    }

    async fn complete(&self, body: &ChatRequest) -> Result<ChatResponse, AdapterError> {
        let mut delay = self.initial_backoff;
        let mut attempt = 1;
        loop {
            match self.send_once(body).await {
                Ok(response) => return Ok(response),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Transient(e)) if attempt < MAX_ATTEMPTS => {
                    warn!(
                        "Model {} attempt {}/{} failed, retrying in {:?}: {}",
                        self.model, attempt, MAX_ATTEMPTS, delay, e
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(MAX_BACKOFF);
                    attempt += 1;
                }
                Err(AttemptError::Transient(e)) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl AgentAdapter for OpenAiCompatibleAdapter {
    async fn generate(&self, request: &TurnRequest) -> Result<AgentReply, AdapterError> {
        if self.api_key.is_none() {
            return Err(AdapterError::Unavailable(format!(
                "no API key for {} ({})",
                request.agent, self.model
            )));
        }
        let body = self.build_request(request);
        debug!(
            "Requesting {} for {} in {} ({} tools offered)",
            self.model,
            request.agent,
            request.phase,
            body.tools.len()
        );
        let response = self.complete(&body).await?;
        Self::parse_reply(response, &request.capabilities)
    }
}
