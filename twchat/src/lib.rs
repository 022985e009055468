//! Tool-calling orchestration over streaming model providers.
//!
//! ```rust
//! use twchat::{ChatSession, ConversationState, LoopContext, CancelHandle};
//!
//! let session = ChatSession::new("session-1", "model-x").with_system_prompt("be brief");
//! let state = ConversationState::with_prompt("hello");
//! let context = LoopContext::new(4, CancelHandle::new());
//!
//! assert_eq!(session.model, "model-x");
//! assert_eq!(state.len(), 1);
//! assert_eq!(context.round_number(), 0);
//! ```

mod context;
mod error;
mod hooks;
mod observer;
mod parser;
mod service;
mod state;
mod types;

pub mod prelude {
    pub use crate::{
        CancelHandle, ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder,
        ChatSession, ConversationState, Fragment, LoopOutcome, LoopPhase, LoopRuntimeHooks,
        ParsedRound, RoundOutput, StructuredChannelFormat, TextEmbeddedFormat, ToolCallParser,
        TranscriptRecorder,
    };
    pub use twcommon::{MetadataMap, SessionId, TraceId};
    pub use twtooling::{
        DispatchMode, DispatchPolicy, ToolDispatcher, ToolError, ToolErrorKind,
        ToolExecutionContext, ToolRegistry, ToolRuntime,
    };
}

pub use context::{CancelHandle, LoopContext};
pub use error::{ChatError, ChatErrorKind};
pub use hooks::{LoopPhase, LoopRuntimeHooks, NoopLoopRuntimeHooks};
pub use observer::{Fragment, FragmentObserver, TranscriptRecorder, TurnObserver};
pub use parser::{
    ParsedRound, RoundOutput, StructuredChannelFormat, TextEmbeddedFormat, ToolCallParser,
    local_call_id, parser_for,
};
pub use service::{ChatPolicy, ChatService, ChatServiceBuilder};
pub use state::ConversationState;
pub use types::{ChatSession, LoopOutcome};
