//! Common imports for most toolweave applications.

pub use crate::{
    chat_service, conversation, definition, observed_chat_service, observed_provider, session,
    tool_call,
};
pub use crate::{tw_schema, tw_turn};
pub use crate::{
    CancelHandle, ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder,
    ChatSession, ConversationState, ConversationTurn, DispatchMode, DispatchPolicy,
    ExtraArguments, Fragment, LoopOutcome, LoopPhase, ModelProvider, ModelRequest, ParamType,
    ParameterSchema, ProviderError, RetryPolicy, Role, SessionId, StopReason, StreamEvent, Tool,
    ToolArguments, ToolCall, ToolDefinition, ToolDispatcher, ToolError, ToolErrorKind,
    ToolExecutionContext, ToolRegistry, ToolResult, ToolRuntime, TranscriptRecorder,
};
