use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::llm_client::ModelClient;
use crate::types::{FunctionCall, Message, ModelTurn, ToolCall};

/// Everything one model call received, recorded for assertions.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub instructions: String,
    pub tools: Option<Value>,
    pub max_tool_calls: Option<u32>,
}

/// Scripted model client: queued responses are returned in order, and every
/// call is recorded. Clones share the same queues.
#[derive(Clone)]
pub struct MockModelClient {
    responses: Arc<Mutex<Vec<ModelTurn>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_text_response(&self, content: &str) {
        self.responses.lock().unwrap().push(ModelTurn {
            text: Some(content.to_string()),
            tool_calls: Vec::new(),
        });
    }

    pub fn add_tool_call_response(&self, call_id: &str, tool_name: &str, args: &str) {
        self.responses.lock().unwrap().push(ModelTurn {
            text: None,
            tool_calls: vec![ToolCall {
                id: call_id.to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: tool_name.to_string(),
                    arguments: args.to_string(),
                },
            }],
        });
    }

    /// One response carrying several tool calls in a single pass.
    pub fn add_tool_calls_response(&self, calls: Vec<(&str, &str, &str)>) {
        self.responses.lock().unwrap().push(ModelTurn {
            text: None,
            tool_calls: calls
                .into_iter()
                .map(|(id, name, args)| ToolCall {
                    id: id.to_string(),
                    call_type: "function".to_string(),
                    function: FunctionCall {
                        name: name.to_string(),
                        arguments: args.to_string(),
                    },
                })
                .collect(),
        });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// A failing client, for exercising the orchestrator's error envelope.
pub struct FailingModelClient {
    pub detail: String,
}

#[async_trait]
impl ModelClient for FailingModelClient {
    async fn call(
        &self,
        _messages: &[Message],
        _instructions: &str,
        _tools: Option<&Value>,
        _max_tool_calls: Option<u32>,
    ) -> anyhow::Result<ModelTurn> {
        Err(anyhow::anyhow!("{}", self.detail))
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn call(
        &self,
        messages: &[Message],
        instructions: &str,
        tools: Option<&Value>,
        max_tool_calls: Option<u32>,
    ) -> anyhow::Result<ModelTurn> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            instructions: instructions.to_string(),
            tools: tools.cloned(),
            max_tool_calls,
        });

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ModelTurn {
                text: Some("No more mock responses configured".to_string()),
                tool_calls: Vec::new(),
            });
        }
        Ok(responses.remove(0))
    }
}
