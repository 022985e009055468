//! Tool registry for lookup by tool definition name.
//!
//! Registration order is preserved and duplicate names are rejected, so
//! [`ToolRegistry::describe_all`] renders the same declarations on every call.
//!
//! ```rust
//! use twprovider::{ParamType, ToolDefinition};
//! use twtooling::{ToolErrorKind, ToolRegistry};
//!
//! let echo = ToolDefinition::builder("echo")
//!     .required("text", ParamType::String)
//!     .build()
//!     .expect("definition should be valid");
//!
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register_sync_fn(echo.clone(), |args, _ctx| Ok(args.string("text")?.to_string()))
//!     .expect("first registration should succeed");
//!
//! let error = registry
//!     .register_sync_fn(echo, |_args, _ctx| Ok(String::new()))
//!     .expect_err("duplicate registration should fail");
//! assert_eq!(error.kind, ToolErrorKind::DuplicateTool);
//! assert_eq!(registry.len(), 1);
//! ```

use std::future::Future;
use std::sync::Arc;

use twcommon::Registry;
use twprovider::ToolDefinition;

use crate::{FunctionTool, Tool, ToolArguments, ToolError, ToolExecutionContext};

#[derive(Clone)]
struct RegisteredTool {
    definition: ToolDefinition,
    tool: Arc<dyn Tool>,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tool` under its declared name.
    ///
    /// The definition is captured once at registration; a later change in
    /// what the tool reports from `definition()` is not observed.
    pub fn register<T>(&mut self, tool: T) -> Result<(), ToolError>
    where
        T: Tool + 'static,
    {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let definition = tool.definition();
        definition.validate().map_err(|error| {
            ToolError::invalid_definition(error.message).with_tool_name(definition.name.clone())
        })?;

        let name = definition.name.clone();
        self.tools
            .try_insert(name.clone(), RegisteredTool { definition, tool })
            .map_err(|_| {
                ToolError::duplicate_tool(format!("tool '{name}' is already registered"))
                    .with_tool_name(name)
            })
    }

    pub fn register_fn<F, Fut>(
        &mut self,
        definition: ToolDefinition,
        handler: F,
    ) -> Result<(), ToolError>
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(definition, handler))
    }

    pub fn register_sync_fn<F>(
        &mut self,
        definition: ToolDefinition,
        handler: F,
    ) -> Result<(), ToolError>
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Result<String, ToolError>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(definition, move |args, context| {
            let output = handler(args, context);
            async move { output }
        })
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.tools
            .get(name)
            .map(|entry| Arc::clone(&entry.tool))
            .ok_or_else(|| ToolError::not_found(format!("unknown tool: {name}")).with_tool_name(name))
    }

    pub fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name).map(|entry| &entry.definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool declarations in registration order.
    pub fn describe_all(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|entry| entry.definition.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
