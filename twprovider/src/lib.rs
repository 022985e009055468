//! Model-facing data model and the streaming model invocation contract.

mod error;
mod model;
mod provider;
mod resilience;
mod schema;
mod stream;

pub mod prelude;

pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    ConversationTurn, ModelRequest, ModelRequestBuilder, ModelResponse, OutputItem, Role,
    StopReason, TokenUsage, ToolCall, ToolOutcome, ToolResult,
};
pub use provider::{CallFraming, ModelProvider, ProviderFuture};
pub use resilience::{
    NoopOperationHooks, ProviderOperationHooks, RetryPolicy, RetryingProvider, execute_with_retry,
};
pub use schema::{ParamType, ParameterSchema, ParameterSpec, ToolDefinition, ToolDefinitionBuilder};
pub use stream::{BoxedEventStream, ModelEventStream, StreamEvent, VecEventStream};
