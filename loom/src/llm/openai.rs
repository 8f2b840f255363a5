//! OpenAI-compatible [`LlmClient`] implementation. The agent is agnostic to
//! the transport (§6.6); this is simply the concrete implementation used in
//! production, pointed at any OpenAI-compatible chat-completions endpoint via
//! `OPENAI_API_BASE`/`OPENAI_API_KEY`.

use async_trait::async_trait;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolChoiceOption, ChatCompletionToolType,
    CreateChatCompletionRequestArgs, FunctionCall, FunctionObjectArgs,
};
use async_openai::Client;
use mcp_protocol::FunctionSchema;

use super::{LlmClient, LlmResponse, ToolChoiceMode};
use crate::error::AgentError;
use crate::message::{Message, Role, ToolCallRequest};

pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
}

impl ChatOpenAI {
    /// Builds a client from `OPENAI_API_KEY` (and optional `OPENAI_API_BASE`)
    /// in the process environment, per the `config` crate's load-then-apply
    /// precedence.
    pub fn from_env() -> Self {
        let mut config = OpenAIConfig::new();
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            config = config.with_api_base(base);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config = config.with_api_key(key);
        }
        Self {
            client: Client::with_config(config),
        }
    }
}

fn to_openai_message(msg: &Message) -> Result<ChatCompletionRequestMessage, AgentError> {
    let built = match msg.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(msg.content.clone())
            .build()
            .map_err(|e| AgentError::Llm(e.to_string()))?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(msg.content.clone())
            .build()
            .map_err(|e| AgentError::Llm(e.to_string()))?
            .into(),
        Role::Assistant => {
            let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
            builder.content(msg.content.clone());
            if !msg.tool_calls.is_empty() {
                builder.tool_calls(msg.tool_calls.iter().map(to_openai_tool_call).collect::<Vec<_>>());
            }
            builder
                .build()
                .map_err(|e| AgentError::Llm(e.to_string()))?
                .into()
        }
        Role::Tool => ChatCompletionRequestToolMessageArgs::default()
            .content(msg.content.clone())
            .tool_call_id(msg.tool_call_id.clone().unwrap_or_default())
            .build()
            .map_err(|e| AgentError::Llm(e.to_string()))?
            .into(),
    };
    Ok(built)
}

/// The agent loop replays an assistant's tool calls on the next turn
/// (§4.4 step 2c); without them attached here, the following `role=tool`
/// messages reference `tool_call_id`s the endpoint never saw requested.
fn to_openai_tool_call(call: &ToolCallRequest) -> ChatCompletionMessageToolCall {
    ChatCompletionMessageToolCall {
        id: call.id.clone(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        },
    }
}

fn to_openai_tool(schema: &FunctionSchema) -> ChatCompletionTool {
    let function = FunctionObjectArgs::default()
        .name(schema.name.clone())
        .description(schema.description.clone().unwrap_or_default())
        .parameters(schema.parameters.clone())
        .build()
        .expect("static function schema always builds");
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function,
    }
}

fn to_openai_tool_choice(mode: ToolChoiceMode) -> ChatCompletionToolChoiceOption {
    match mode {
        ToolChoiceMode::Auto => ChatCompletionToolChoiceOption::Auto,
        ToolChoiceMode::None => ChatCompletionToolChoiceOption::None,
        ToolChoiceMode::Required => ChatCompletionToolChoiceOption::Required,
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn chat_completions(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[FunctionSchema],
        tool_choice: ToolChoiceMode,
    ) -> Result<LlmResponse, AgentError> {
        let openai_messages = messages
            .iter()
            .map(to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(model).messages(openai_messages);
        if !tools.is_empty() {
            let openai_tools: Vec<ChatCompletionTool> = tools.iter().map(to_openai_tool).collect();
            builder.tools(openai_tools);
            builder.tool_choice(to_openai_tool_choice(tool_choice));
        }
        let request = builder
            .build()
            .map_err(|e| AgentError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::Llm(e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Llm("openai response had no choices".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCallRequest {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        Ok(LlmResponse { content, tool_calls })
    }
}
