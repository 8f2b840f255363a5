//! Error taxonomy for the agent runtime.

use thiserror::Error;

/// Errors the agent loop itself can raise. Tool and LLM failures are folded
/// into the conversation as `role=tool` messages where possible (§7
/// Application / ToolDispatchError); this enum covers what cannot recover
/// that way.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("llm call failed: {0}")]
    Llm(String),

    #[error("tool call arguments were not valid json: {0}")]
    MalformedToolArguments(String),

    #[error("agent exhausted its turn budget without a final answer")]
    BudgetExceeded,
}
