use std::sync::Arc;

use serde_json::Value;

use crate::llm_client::ModelClient;
use crate::persona::Persona;
use crate::store::EmployeeStore;
use crate::tool_registry::ToolRegistry;
use crate::types::{ChatTurn, Identity, Message, QueryOutcome, ToolCall, ToolOutput};

pub const EMPTY_RESPONSE_MESSAGE: &str = "[Empty response from model]";
pub const ERROR_MESSAGE_PREFIX: &str = "Error querying language model:";
pub const AUTH_RETRY_MESSAGE: &str = "You gave me the wrong name or id, or the user does not \
     exist in the database. Please try again.";

fn greeting(name: &str) -> String {
    format!("Hi {name}, how can I help you?")
}

/// Runs the two-pass dialogue protocol against an injected model client and
/// employee store. Per request the state machine is INITIAL_CALL, then
/// FOLLOWUP_CALL only when the first pass requested tools, then DONE. Every
/// failure is absorbed here and turned into an error-prefixed chat message;
/// callers never see an Err.
pub struct Orchestrator {
    llm: Arc<dyn ModelClient>,
    store: Arc<dyn EmployeeStore>,
    registry: ToolRegistry,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn ModelClient>, store: Arc<dyn EmployeeStore>) -> Self {
        Self {
            llm,
            store,
            registry: ToolRegistry::new(),
        }
    }

    /// History turns in original order, the new user message appended last.
    /// No reordering, no deduplication.
    pub fn build_prompt(user_message: &str, history: &[ChatTurn]) -> Vec<Message> {
        let mut messages: Vec<Message> = history
            .iter()
            .map(|turn| Message::plain(&turn.role, &turn.content))
            .collect();
        messages.push(Message::user(user_message));
        messages
    }

    /// One authenticated-persona request. The returned identity is whatever a
    /// tool resolved this turn, else the identity the caller supplied.
    pub async fn run_query(
        &self,
        persona: Persona,
        user_message: &str,
        history: &[ChatTurn],
        identity: Option<Identity>,
    ) -> QueryOutcome {
        match self
            .try_run_query(persona, user_message, history, identity.clone())
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => error_outcome(err, identity),
        }
    }

    async fn try_run_query(
        &self,
        persona: Persona,
        user_message: &str,
        history: &[ChatTurn],
        identity: Option<Identity>,
    ) -> anyhow::Result<QueryOutcome> {
        let messages = Self::build_prompt(user_message, history);
        let instructions = persona.instructions();
        let tools = self.registry.schemas_for(persona.allowed_tools());

        let initial = self
            .llm
            .call(
                &messages,
                &instructions,
                Some(&tools),
                Some(persona.max_tool_calls()),
            )
            .await?;

        let (outputs, resolved) = self.run_tool_calls(&initial.tool_calls, identity.as_ref())?;
        let identity = resolved.or(identity);

        if outputs.is_empty() {
            return Ok(QueryOutcome {
                message: final_text(initial.text),
                identity,
            });
        }

        // Second pass: original messages, then the request items in the order
        // received, then the outputs in the order produced. No tools attached.
        let followup_input = with_tool_results(&messages, &initial.tool_calls, &outputs);
        let followup = self
            .llm
            .call(&followup_input, &instructions, None, None)
            .await?;

        Ok(QueryOutcome {
            message: final_text(followup.text),
            identity,
        })
    }

    /// Authentication variant: a single pass with the identity-check tool.
    /// The existence boolean alone answers the user, so no followup call.
    pub async fn authenticate(&self, user_message: &str, history: &[ChatTurn]) -> QueryOutcome {
        match self.try_authenticate(user_message, history).await {
            Ok(outcome) => outcome,
            Err(err) => error_outcome(err, None),
        }
    }

    async fn try_authenticate(
        &self,
        user_message: &str,
        history: &[ChatTurn],
    ) -> anyhow::Result<QueryOutcome> {
        let persona = Persona::Authentication;
        let messages = Self::build_prompt(user_message, history);
        let tools = self.registry.schemas_for(persona.allowed_tools());

        let initial = self
            .llm
            .call(
                &messages,
                &persona.instructions(),
                Some(&tools),
                Some(persona.max_tool_calls()),
            )
            .await?;

        let (outputs, resolved) = self.run_tool_calls(&initial.tool_calls, None)?;
        if outputs.is_empty() {
            // The model is still collecting credentials from the user.
            return Ok(QueryOutcome {
                message: final_text(initial.text),
                identity: None,
            });
        }

        let exists = outputs[0]
            .output
            .get("exists")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !exists {
            return Ok(QueryOutcome {
                message: AUTH_RETRY_MESSAGE.to_string(),
                identity: None,
            });
        }

        let identity = resolved
            .ok_or_else(|| anyhow::anyhow!("identity check reported exists without an identity"))?;
        Ok(QueryOutcome {
            message: greeting(&identity.employee_name),
            identity: Some(identity),
        })
    }

    /// Dispatch every requested invocation with the identity known at the
    /// start of the pass. Outputs keep the request call ids; the last
    /// non-null identity a handler resolves wins.
    fn run_tool_calls(
        &self,
        calls: &[ToolCall],
        identity: Option<&Identity>,
    ) -> anyhow::Result<(Vec<ToolOutput>, Option<Identity>)> {
        let mut outputs = Vec::with_capacity(calls.len());
        let mut resolved: Option<Identity> = None;

        for call in calls {
            tracing::debug!(tool = %call.function.name, call_id = %call.id, "dispatching tool");
            let (output, extracted) = self.registry.dispatch(
                &call.function.name,
                &call.function.arguments,
                identity,
                self.store.as_ref(),
            )?;
            outputs.push(ToolOutput {
                call_id: call.id.clone(),
                output,
            });
            if extracted.is_some() {
                resolved = extracted;
            }
        }

        Ok((outputs, resolved))
    }
}

fn with_tool_results(
    messages: &[Message],
    calls: &[ToolCall],
    outputs: &[ToolOutput],
) -> Vec<Message> {
    let mut combined = messages.to_vec();
    combined.push(Message::assistant_tool_calls(calls.to_vec()));
    for output in outputs {
        combined.push(Message::tool(&output.call_id, output.output.to_string()));
    }
    combined
}

fn final_text(text: Option<String>) -> String {
    match text {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => EMPTY_RESPONSE_MESSAGE.to_string(),
    }
}

/// Single-line, no stack trace, identity as known before the failure.
fn error_outcome(err: anyhow::Error, identity: Option<Identity>) -> QueryOutcome {
    tracing::error!(error = %err, "query execution failed");
    QueryOutcome {
        message: format!("{ERROR_MESSAGE_PREFIX} {err}"),
        identity,
    }
}
