//! The bounded ReAct loop (§4.4): alternate asking the model for a turn and
//! dispatching whatever tool calls it requests, until it returns a plain
//! answer, asks for a GUI action, or the turn budget runs out.

use std::sync::Arc;

use serde_json::Value;

use crate::error::AgentError;
use crate::llm::{LlmClient, ToolChoiceMode};
use crate::message::Message;
use crate::tool_catalog::ToolCatalog;

/// Hard ceiling on model round-trips for a single `run` call (§4.4).
pub const MAX_AGENT_TURNS: usize = 10;

/// What the loop produced.
#[derive(Debug, Clone)]
pub enum AgentOutcome {
    /// The model answered in plain text with no further tool calls pending.
    FinalAnswer(String),
    /// The model requested a GUI action instead of a text answer: a tool call
    /// whose arguments carry a `gui_tool` key short-circuits the loop and is
    /// handed back to the caller rather than dispatched through the catalog.
    GuiCommand { tool: String, args: Value },
}

pub struct Agent {
    llm: Arc<dyn LlmClient>,
    model: String,
    catalog: ToolCatalog,
    tool_choice: ToolChoiceMode,
}

impl Agent {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, catalog: ToolCatalog) -> Self {
        Self {
            llm,
            model: model.into(),
            catalog,
            tool_choice: ToolChoiceMode::Auto,
        }
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoiceMode) -> Self {
        self.tool_choice = tool_choice;
        self
    }

    pub async fn run(&self, system_prompt: &str, user_message: &str) -> Result<AgentOutcome, AgentError> {
        let mut messages = vec![Message::system(system_prompt), Message::user(user_message)];
        let schemas = self.catalog.schemas();

        for turn in 0..MAX_AGENT_TURNS {
            tracing::debug!(turn, "requesting next agent turn");
            let response = self
                .llm
                .chat_completions(&self.model, &messages, &schemas, self.tool_choice)
                .await?;

            if response.tool_calls.is_empty() {
                return Ok(AgentOutcome::FinalAnswer(response.content));
            }

            let tool_calls = response.tool_calls.clone();
            messages.push(Message::assistant_with_tool_calls(response.content, tool_calls.clone()));

            for call in &tool_calls {
                let args: Value = match serde_json::from_str(&call.arguments) {
                    Ok(v) => v,
                    Err(e) => {
                        let notice = format!("tool call arguments were not valid json: {e}");
                        tracing::warn!(tool = %call.name, error = %e, "malformed tool arguments");
                        messages.push(Message::tool_result(call.id.clone(), notice));
                        continue;
                    }
                };

                if !self.catalog.contains(&call.name) {
                    tracing::warn!(tool = %call.name, "requested tool is not in this agent's catalog");
                    messages.push(Message::tool_result(call.id.clone(), "tool not available"));
                    continue;
                }

                let is_local = self.catalog.is_local(&call.name);
                let result = match self.catalog.call(&call.name, args).await {
                    Ok(s) => s,
                    Err(e) => format!("tool error: {e}"),
                };
                tracing::info!(tool = %call.name, result = %redacted_for_log(&result), "tool call completed");

                // GUI-command short-circuit (§4.4e): a *local*-tool result that is
                // itself a JSON object with a top-level `gui_tool` key is the sole
                // mechanism by which an agent produces a structured, non-textual
                // final reply. Remote MCP results never short-circuit this way.
                if is_local {
                    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(&result) {
                        if let Some(gui_tool) = obj.get("gui_tool").and_then(Value::as_str) {
                            return Ok(AgentOutcome::GuiCommand {
                                tool: gui_tool.to_string(),
                                args: Value::Object(obj),
                            });
                        }
                    }
                }

                messages.push(Message::tool_result(call.id.clone(), result));
            }
        }

        tracing::warn!(turns = MAX_AGENT_TURNS, "agent exhausted its turn budget");
        Ok(AgentOutcome::FinalAnswer(
            "I wasn't able to finish within my turn budget. Please try rephrasing or breaking the request down."
                .to_string(),
        ))
    }
}

/// Recursively walks a tool result so tracing output never fills up with
/// screenshot blobs (§4.4): any string value starting with `data:image` is
/// replaced by `<image len=N>`, through nested arrays and objects. Results
/// that don't parse as JSON are matched as a single string value.
fn redacted_for_log(result: &str) -> String {
    match serde_json::from_str::<Value>(result) {
        Ok(value) => redact_value(value).to_string(),
        Err(_) => redact_plain_string(result),
    }
}

fn redact_plain_string(s: &str) -> String {
    if s.starts_with("data:image") {
        format!("<image len={}>", s.len())
    } else {
        s.to_string()
    }
}

fn redact_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(redact_plain_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(redact_value).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, redact_value(v))).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmResponse, MockLlm};
    use crate::message::ToolCallRequest;
    use crate::tool_catalog::{LocalTool, ToolError};
    use async_trait::async_trait;
    use mcp_protocol::FunctionSchema;

    struct Echo;

    #[async_trait]
    impl LocalTool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn schema(&self) -> FunctionSchema {
            FunctionSchema {
                name: "echo".into(),
                description: None,
                parameters: serde_json::json!({"type": "object"}),
            }
        }
        async fn call(&self, args: Value) -> Result<String, ToolError> {
            Ok(args.to_string())
        }
    }

    #[tokio::test]
    async fn plain_text_response_ends_loop_immediately() {
        let llm = Arc::new(MockLlm::once("hi there"));
        let agent = Agent::new(llm, "test-model", ToolCatalog::new());
        let outcome = agent.run("sys", "hello").await.unwrap();
        match outcome {
            AgentOutcome::FinalAnswer(text) => assert_eq!(text, "hi there"),
            _ => panic!("expected final answer"),
        }
    }

    #[tokio::test]
    async fn tool_call_dispatches_then_next_turn_answers() {
        let mut catalog = ToolCatalog::new();
        catalog.register_local(Arc::new(Echo));

        let first = LlmResponse {
            content: String::new(),
            tool_calls: vec![ToolCallRequest {
                id: "call_1".into(),
                name: "echo".into(),
                arguments: "{\"x\":1}".into(),
            }],
        };
        let second = LlmResponse {
            content: "done".into(),
            tool_calls: vec![],
        };
        let llm = Arc::new(MockLlm::new(vec![first, second]));
        let agent = Agent::new(llm, "test-model", catalog);
        let outcome = agent.run("sys", "go").await.unwrap();
        match outcome {
            AgentOutcome::FinalAnswer(text) => assert_eq!(text, "done"),
            _ => panic!("expected final answer"),
        }
    }

    struct DisplayText;

    #[async_trait]
    impl LocalTool for DisplayText {
        fn name(&self) -> &str {
            "display_text"
        }
        fn schema(&self) -> FunctionSchema {
            FunctionSchema {
                name: "display_text".into(),
                description: None,
                parameters: serde_json::json!({"type": "object"}),
            }
        }
        async fn call(&self, _args: Value) -> Result<String, ToolError> {
            Ok(serde_json::json!({"gui_tool": "display_text", "text": "hi"}).to_string())
        }
    }

    #[tokio::test]
    async fn gui_tool_result_short_circuits_as_gui_command() {
        let mut catalog = ToolCatalog::new();
        catalog.register_local(Arc::new(DisplayText));

        let first = LlmResponse {
            content: String::new(),
            tool_calls: vec![ToolCallRequest {
                id: "call_1".into(),
                name: "display_text".into(),
                arguments: "{}".into(),
            }],
        };
        let llm = Arc::new(MockLlm::new(vec![first]));
        let agent = Agent::new(llm, "test-model", catalog);
        let outcome = agent.run("sys", "go").await.unwrap();
        match outcome {
            AgentOutcome::GuiCommand { tool, .. } => assert_eq!(tool, "display_text"),
            _ => panic!("expected gui command"),
        }
    }

    #[tokio::test]
    async fn unknown_tool_name_is_reported_back_without_failing_the_turn() {
        let first = LlmResponse {
            content: String::new(),
            tool_calls: vec![ToolCallRequest {
                id: "call_1".into(),
                name: "nonexistent".into(),
                arguments: "{}".into(),
            }],
        };
        let second = LlmResponse {
            content: "ok".into(),
            tool_calls: vec![],
        };
        let llm = Arc::new(MockLlm::new(vec![first, second]));
        let agent = Agent::new(llm, "test-model", ToolCatalog::new());
        let outcome = agent.run("sys", "go").await.unwrap();
        assert!(matches!(outcome, AgentOutcome::FinalAnswer(text) if text == "ok"));
    }

    #[test]
    fn redacted_for_log_replaces_a_bare_data_uri_string() {
        let s = "data:image/png;base64,AAAA";
        assert_eq!(redacted_for_log(s), format!("<image len={}>", s.len()));
    }

    #[test]
    fn redacted_for_log_walks_nested_json_and_keeps_other_fields() {
        let uri_a = "data:image/png;base64,AAAA";
        let uri_b = "data:image/png;base64,BBBB";
        let payload = serde_json::json!({
            "img": uri_a,
            "hp": 42,
            "nested": {"thumbnails": [uri_b, "not a uri"]},
        })
        .to_string();

        let redacted: Value = serde_json::from_str(&redacted_for_log(&payload)).unwrap();
        assert_eq!(redacted["hp"], 42);
        assert_eq!(redacted["img"], format!("<image len={}>", uri_a.len()));
        assert_eq!(redacted["nested"]["thumbnails"][0], format!("<image len={}>", uri_b.len()));
        assert_eq!(redacted["nested"]["thumbnails"][1], "not a uri");
    }
}
