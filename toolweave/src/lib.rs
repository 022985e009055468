//! Toolweave: a tool-calling orchestration loop over streaming model providers.
//!
//! This crate re-exports the workspace crates and adds a few wiring helpers
//! and macros for the common setup.
//!
//! ```rust
//! use toolweave::prelude::*;
//!
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register_sync_fn(
//!         definition("echo", "Returns its input", tw_schema![text: string])
//!             .expect("definition should be valid"),
//!         |args, _ctx| Ok(args.string("text")?.to_string()),
//!     )
//!     .expect("echo should register");
//!
//! let state = conversation("Say hi through the echo tool");
//! assert_eq!(state.len(), 1);
//! assert!(registry.contains("echo"));
//! ```

mod macros;
pub mod prelude;
pub mod runtime;
pub mod util;

pub use twchat;
pub use twcommon;
pub use twobserve;
pub use twprovider;
pub use twtooling;

pub use twchat::{
    CancelHandle, ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder,
    ChatSession, ConversationState, Fragment, FragmentObserver, LoopContext, LoopOutcome,
    LoopPhase, LoopRuntimeHooks, NoopLoopRuntimeHooks, ParsedRound, RoundOutput,
    StructuredChannelFormat, TextEmbeddedFormat, ToolCallParser, TranscriptRecorder, TurnObserver,
    local_call_id, parser_for,
};
pub use twcommon::{BoxFuture, GenerationOptions, MetadataMap, SessionId, TraceId};
pub use twobserve::{
    MetricsObservabilityHooks, SafeLoopHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};
pub use twprovider::{
    BoxedEventStream, CallFraming, ConversationTurn, ModelEventStream, ModelProvider,
    ModelRequest, ModelRequestBuilder, ModelResponse, NoopOperationHooks, OutputItem, ParamType,
    ParameterSchema, ParameterSpec, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderOperationHooks, RetryPolicy, RetryingProvider, Role, StopReason, StreamEvent,
    TokenUsage, ToolCall, ToolDefinition, ToolDefinitionBuilder, ToolOutcome, ToolResult,
    VecEventStream,
};
pub use twtooling::{
    DispatchMode, DispatchPolicy, ExtraArguments, FunctionTool, NoopToolRuntimeHooks, Tool,
    ToolArguments, ToolDispatcher, ToolError, ToolErrorKind, ToolExecutionContext, ToolFuture,
    ToolRegistry, ToolRuntime, ToolRuntimeHooks, parse_json_object, parse_json_value,
    validate_arguments,
};

pub use runtime::{chat_service, observed_chat_service, observed_provider};
pub use util::{conversation, definition, session, tool_call};
