//! Common `twprovider` imports for downstream crates.

pub use crate::{
    BoxedEventStream, CallFraming, ConversationTurn, ModelEventStream, ModelProvider,
    ModelRequest, ModelRequestBuilder, ModelResponse, NoopOperationHooks, OutputItem, ParamType,
    ParameterSchema, ParameterSpec, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderOperationHooks, RetryPolicy, RetryingProvider, Role, StopReason, StreamEvent,
    TokenUsage, ToolCall, ToolDefinition, ToolOutcome, ToolResult, VecEventStream,
    execute_with_retry,
};
pub use twcommon::{BoxFuture, MetadataMap};
