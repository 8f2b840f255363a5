//! The injected LLM capability (§6.6): `chat_completions(model, messages,
//! tools, tool_choice) -> {content?, tool_calls?}`. Any implementation that
//! satisfies this shape is acceptable; the agent loop only depends on the
//! [`LlmClient`] trait.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use mcp_protocol::FunctionSchema;

use crate::error::AgentError;
use crate::message::{Message, ToolCallRequest};

/// Controls whether the model may, must not, or must call a tool this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolChoiceMode {
    #[default]
    Auto,
    None,
    Required,
}

impl std::str::FromStr for ToolChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "required" => Ok(Self::Required),
            _ => Err(format!("unknown tool_choice: {s} (use auto, none, or required)")),
        }
    }
}

/// Response from one chat-completion call.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    pub content: String,
    /// Empty means no tool calls were requested this turn.
    pub tool_calls: Vec<ToolCallRequest>,
}

/// Single external capability the agent loop depends on.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completions(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[FunctionSchema],
        tool_choice: ToolChoiceMode,
    ) -> Result<LlmResponse, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_choice_mode_from_str_parses_known_values() {
        assert_eq!("auto".parse::<ToolChoiceMode>().unwrap(), ToolChoiceMode::Auto);
        assert_eq!("none".parse::<ToolChoiceMode>().unwrap(), ToolChoiceMode::None);
        assert_eq!("required".parse::<ToolChoiceMode>().unwrap(), ToolChoiceMode::Required);
    }

    #[test]
    fn tool_choice_mode_from_str_rejects_unknown_value() {
        let err = "unexpected".parse::<ToolChoiceMode>().unwrap_err();
        assert!(err.contains("unknown tool_choice"));
    }
}
