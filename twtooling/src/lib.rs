//! Tool registration, argument validation, and failure-capturing dispatch.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use twprovider::{ParamType, ToolCall, ToolDefinition};
//! use twtooling::{ToolDispatcher, ToolExecutionContext, ToolRegistry, ToolRuntime};
//!
//! # tokio_test();
//! # fn tokio_test() {
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register_sync_fn(
//!         ToolDefinition::builder("echo")
//!             .required("text", ParamType::String)
//!             .build()
//!             .expect("definition should be valid"),
//!         |args, _ctx| Ok(args.string("text")?.to_string()),
//!     )
//!     .expect("echo should register");
//!
//! let dispatcher = ToolDispatcher::new(Arc::new(registry));
//! assert_eq!(dispatcher.definitions().len(), 1);
//! # let _ = (ToolCall::new("c1", "echo", "{}"), ToolExecutionContext::new("s"));
//! # }
//! ```

mod args;
mod dispatcher;
mod error;
mod hooks;
mod registry;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        DispatchMode, DispatchPolicy, ExtraArguments, FunctionTool, NoopToolRuntimeHooks, Tool,
        ToolArguments, ToolDispatcher, ToolError, ToolErrorKind, ToolExecutionContext,
        ToolFuture, ToolRegistry, ToolRuntime, ToolRuntimeHooks,
    };
}

pub use args::{
    ExtraArguments, ToolArguments, parse_json_object, parse_json_value, validate_arguments,
};
pub use dispatcher::{DispatchMode, DispatchPolicy, ToolDispatcher, ToolRuntime};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::ToolRegistry;
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::ToolExecutionContext;
