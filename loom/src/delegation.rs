//! Hierarchical delegation (§4.4): `execute_rpg_task` hands one self-contained
//! instruction off to a fresh sub-agent that can see only the RPG MCP's
//! methods, rather than growing the top-level agent's own catalog and
//! conversation with game-specific back-and-forth.

use std::sync::Arc;

use async_trait::async_trait;
use mcp_client::McpHandle;
use mcp_protocol::FunctionSchema;
use serde_json::Value;

use crate::agent::{Agent, AgentOutcome};
use crate::llm::LlmClient;
use crate::tool_catalog::{LocalTool, ToolCatalog, ToolError};

const RPG_SUBAGENT_SYSTEM_PROMPT: &str = "You are controlling a character in a text-based RPG world. \
You have access only to the RPG's own tools. Carry out exactly the task you were given, \
using as many tool calls as needed, then report the outcome in one concise message.";

/// A local tool that, when called, runs its own bounded agent loop against a
/// single MCP (the RPG server) and folds the result back into the parent
/// conversation as one tool message.
pub struct RpgTaskDelegate {
    llm: Arc<dyn LlmClient>,
    model: String,
    rpg_handle: Arc<McpHandle>,
}

impl RpgTaskDelegate {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, rpg_handle: Arc<McpHandle>) -> Self {
        Self {
            llm,
            model: model.into(),
            rpg_handle,
        }
    }
}

#[async_trait]
impl LocalTool for RpgTaskDelegate {
    fn name(&self) -> &str {
        "execute_rpg_task"
    }

    fn schema(&self) -> FunctionSchema {
        FunctionSchema {
            name: "execute_rpg_task".to_string(),
            description: Some(
                "Delegate one self-contained RPG action (move, attack, talk to an NPC, use an \
                 item, and so on) to a sub-agent that can only see RPG tools."
                    .to_string(),
            ),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "task": {
                        "type": "string",
                        "description": "A single, self-contained instruction for the RPG sub-agent to carry out."
                    }
                },
                "required": ["task"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let task = args
            .get("task")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::Application("missing required 'task' string".to_string()))?;

        let functions = self.rpg_handle.list_functions().await?;
        let mut catalog = ToolCatalog::new();
        for schema in functions {
            let method = schema.name.clone();
            catalog.register_remote(schema, self.rpg_handle.clone(), method);
        }

        let agent = Agent::new(self.llm.clone(), self.model.clone(), catalog);
        let outcome = agent
            .run(RPG_SUBAGENT_SYSTEM_PROMPT, task)
            .await
            .map_err(|e| ToolError::Application(e.to_string()))?;

        let text = match outcome {
            AgentOutcome::FinalAnswer(text) => text,
            AgentOutcome::GuiCommand { tool, args } => format!("[{tool}] {args}"),
        };

        Ok(serde_json::json!({ "gui_tool": "display_text", "text": text }).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_task_string() {
        let delegate = RpgTaskDelegate::new(
            Arc::new(crate::llm::MockLlm::once("unused")),
            "test-model",
            Arc::new(McpHandle::new("rpg", "http://127.0.0.1:1".to_string())),
        );
        let schema = delegate.schema();
        assert_eq!(schema.name, "execute_rpg_task");
        assert_eq!(schema.parameters["required"][0], "task");
    }
}
