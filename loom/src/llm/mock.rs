//! A fixed/scripted [`LlmClient`] for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use mcp_protocol::FunctionSchema;

use super::{LlmClient, LlmResponse, ToolChoiceMode};
use crate::error::AgentError;
use crate::message::Message;

/// Replays a fixed sequence of responses, one per call. Panics if called more
/// times than responses were supplied (a test bug, not a runtime concern).
pub struct MockLlm {
    responses: Mutex<Vec<LlmResponse>>,
}

impl MockLlm {
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().rev().collect()),
        }
    }

    /// Convenience constructor for a single plain-text reply.
    pub fn once(content: impl Into<String>) -> Self {
        Self::new(vec![LlmResponse {
            content: content.into(),
            tool_calls: Vec::new(),
        }])
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn chat_completions(
        &self,
        _model: &str,
        _messages: &[Message],
        _tools: &[FunctionSchema],
        _tool_choice: ToolChoiceMode,
    ) -> Result<LlmResponse, AgentError> {
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| AgentError::Llm("MockLlm: no more scripted responses".to_string()))
    }
}
