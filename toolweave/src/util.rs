//! Small convenience constructors for common types.

use crate::{
    ChatSession, ConversationState, ParameterSchema, ProviderError, SessionId, ToolCall,
    ToolDefinition,
};

pub fn definition(
    name: impl Into<String>,
    description: impl Into<String>,
    parameters: ParameterSchema,
) -> Result<ToolDefinition, ProviderError> {
    ToolDefinition::builder(name)
        .description(description)
        .parameters(parameters)
        .build()
}

pub fn conversation(prompt: impl Into<String>) -> ConversationState {
    ConversationState::with_prompt(prompt)
}

pub fn session(id: impl Into<SessionId>, model: impl Into<String>) -> ChatSession {
    ChatSession::new(id, model)
}

pub fn tool_call(
    id: impl Into<String>,
    name: impl Into<String>,
    arguments: impl Into<String>,
) -> ToolCall {
    ToolCall::new(id, name, arguments)
}
