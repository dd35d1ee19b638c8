use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendError;
use crate::types::{Message, ModelTurn, ToolCall};

/// The one capability the orchestrator needs from a language model. `tools`
/// and `max_tool_calls` are attached on the initial pass only; the followup
/// pass sends neither.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn call(
        &self,
        messages: &[Message],
        instructions: &str,
        tools: Option<&Value>,
        max_tool_calls: Option<u32>,
    ) -> anyhow::Result<ModelTurn>;
}

/// OpenAI-compatible chat-completions client, non-streaming.
pub struct LlmClient {
    base_url: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(base_url: String, api_key: String, model: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            base_url,
            api_key,
            model,
            http,
        })
    }
}

#[async_trait]
impl ModelClient for LlmClient {
    async fn call(
        &self,
        messages: &[Message],
        instructions: &str,
        tools: Option<&Value>,
        max_tool_calls: Option<u32>,
    ) -> anyhow::Result<ModelTurn> {
        let url = format!("{}/chat/completions", self.base_url);

        // Instructions ride as a leading system message; the caller-supplied
        // sequence is forwarded verbatim after it.
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(Message::system(instructions));
        wire.extend_from_slice(messages);

        let mut req = serde_json::json!({
            "model": self.model,
            "messages": wire,
            "stream": false,
        });
        if let Some(tools) = tools {
            req["tools"] = tools.clone();
        }
        if let Some(limit) = max_tool_calls {
            req["max_tool_calls"] = Value::from(limit);
        }

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = resp.json().await?;
        let message = body["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .map(|choice| &choice["message"])
            .ok_or_else(|| BackendError::MalformedResponse("no choices in reply".to_string()))?;

        let text = message["content"].as_str().map(str::to_string);
        let tool_calls = match message["tool_calls"].as_array() {
            Some(calls) => calls
                .iter()
                .map(|call| serde_json::from_value::<ToolCall>(call.clone()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| BackendError::MalformedResponse(format!("bad tool call: {e}")))?,
            None => Vec::new(),
        };

        Ok(ModelTurn { text, tool_calls })
    }
}
