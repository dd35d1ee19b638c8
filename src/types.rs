use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One turn of caller-supplied conversation history. The caller owns the
/// history; nothing here is persisted server-side.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChatTurn {
    pub role: String, // "user" | "assistant" | "system"
    pub content: String,
}

/// An (id, name) pair. Unauthenticated until an existence check against the
/// employee store has confirmed it; the caller resends it on every request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub employee_id: String,
    pub employee_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String, // "function"
    pub function: FunctionCall,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String, // raw JSON string as sent by the model
}

/// Wire message for the chat-completions payload.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: String, // "user" | "assistant" | "tool" | "system"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn plain(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn system(content: &str) -> Self {
        Self::plain("system", content)
    }

    pub fn user(content: &str) -> Self {
        Self::plain("user", content)
    }

    /// Assistant message carrying the tool invocation requests of a pass.
    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    /// Tool result message, correlated back to its request by call id.
    pub fn tool(call_id: &str, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(call_id.to_string()),
        }
    }
}

/// What one model call produced: free text, tool invocation requests, or both.
#[derive(Clone, Debug)]
pub struct ModelTurn {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

/// Result of one tool invocation, matched back to its request by call id,
/// never by position.
#[derive(Clone, Debug)]
pub struct ToolOutput {
    pub call_id: String,
    pub output: Value,
}

/// Final orchestrator output for one request.
#[derive(Clone, Debug)]
pub struct QueryOutcome {
    pub message: String,
    pub identity: Option<Identity>,
}
