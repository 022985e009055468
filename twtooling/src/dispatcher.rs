//! Tool dispatch: validation, invocation, and failure capture.
//!
//! Dispatch never fails. Unknown tools, invalid arguments, tool errors,
//! panics, and deadline overruns all come back as error [`ToolResult`]s.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use futures_util::future::join_all;
use twcommon::with_deadline;
use twprovider::{ToolCall, ToolDefinition, ToolResult};

use crate::{
    ExtraArguments, NoopToolRuntimeHooks, ToolError, ToolErrorKind, ToolExecutionContext,
    ToolFuture, ToolRegistry, ToolRuntimeHooks, validate_arguments,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    #[default]
    Sequential,
    /// Calls within a round run concurrently; results keep call order.
    Concurrent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchPolicy {
    pub mode: DispatchMode,
    pub extra_arguments: ExtraArguments,
    pub call_timeout: Option<Duration>,
}

impl DispatchPolicy {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn concurrent() -> Self {
        Self {
            mode: DispatchMode::Concurrent,
            ..Self::default()
        }
    }

    pub fn with_extra_arguments(mut self, extra_arguments: ExtraArguments) -> Self {
        self.extra_arguments = extra_arguments;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = Some(call_timeout);
        self
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        if self.call_timeout.is_some_and(|limit| limit.is_zero()) {
            return Err(ToolError::other("call_timeout must be greater than zero"));
        }

        Ok(())
    }
}

pub trait ToolRuntime: Send + Sync {
    /// Declarations advertised to the model producer.
    fn definitions(&self) -> Vec<ToolDefinition>;

    fn dispatch<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, ToolResult>;

    /// Dispatches one round of calls, returning results in call order.
    fn dispatch_all<'a>(
        &'a self,
        tool_calls: Vec<ToolCall>,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Vec<ToolResult>> {
        Box::pin(async move {
            let mut results = Vec::with_capacity(tool_calls.len());
            for tool_call in tool_calls {
                results.push(self.dispatch(tool_call, context.clone()).await);
            }
            results
        })
    }
}

#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    policy: DispatchPolicy,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(ToolRegistry::new()))
    }
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            policy: DispatchPolicy::default(),
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Result<Self, ToolError> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    async fn execute(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
    ) -> Result<String, ToolError> {
        let tool = self.registry.lookup(&tool_call.name)?;
        let definition = self
            .registry
            .definition(&tool_call.name)
            .ok_or_else(|| ToolError::not_found(format!("unknown tool: {}", tool_call.name)))?;
        let args = validate_arguments(
            &definition.parameters,
            &tool_call.arguments,
            self.policy.extra_arguments,
        )?;

        let invocation = async move {
            match AssertUnwindSafe(async { tool.invoke(args, context).await })
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(panic) => Err(panic_error(panic)),
            }
        };

        match self.policy.call_timeout {
            Some(limit) => with_deadline(invocation, limit).await.unwrap_or_else(|| {
                Err(ToolError::timeout(format!(
                    "tool '{}' timed out after {}ms",
                    tool_call.name,
                    limit.as_millis()
                )))
            }),
            None => invocation.await,
        }
    }
}

impl ToolRuntime for ToolDispatcher {
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.describe_all()
    }

    fn dispatch<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, ToolResult> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks.on_call_start(&tool_call, &context);

            match self.execute(&tool_call, &context).await {
                Ok(output) => {
                    let result = ToolResult::success(tool_call.id.clone(), output);
                    self.hooks
                        .on_call_resolved(&tool_call, &context, &result, started.elapsed());
                    result
                }
                Err(error) => {
                    let error = error
                        .with_tool_name(tool_call.name.clone())
                        .with_tool_call_id(tool_call.id.clone());
                    self.hooks
                        .on_call_rejected(&tool_call, &context, &error, started.elapsed());
                    ToolResult::error(tool_call.id.clone(), result_message(&tool_call, &error))
                }
            }
        })
    }

    fn dispatch_all<'a>(
        &'a self,
        tool_calls: Vec<ToolCall>,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Vec<ToolResult>> {
        Box::pin(async move {
            let started = Instant::now();
            let results = match self.policy.mode {
                DispatchMode::Concurrent => {
                    let pending = tool_calls
                        .into_iter()
                        .map(|tool_call| self.dispatch(tool_call, context.clone()));
                    join_all(pending).await
                }
                DispatchMode::Sequential => {
                    let mut results = Vec::with_capacity(tool_calls.len());
                    for tool_call in tool_calls {
                        results.push(self.dispatch(tool_call, context.clone()).await);
                    }
                    results
                }
            };

            self.hooks
                .on_round_dispatched(&context, self.policy.mode, &results, started.elapsed());
            results
        })
    }
}

fn result_message(tool_call: &ToolCall, error: &ToolError) -> String {
    match error.kind {
        ToolErrorKind::NotFound | ToolErrorKind::Timeout => error.message.clone(),
        ToolErrorKind::InvalidArguments => format!(
            "invalid arguments for tool '{}': {}",
            tool_call.name, error.message
        ),
        _ => format!("tool '{}' failed: {}", tool_call.name, error.message),
    }
}

fn panic_error(panic: Box<dyn Any + Send>) -> ToolError {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    ToolError::execution(format!("panicked: {detail}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use twprovider::{ParamType, ToolDefinition};

    use super::*;
    use crate::{Tool, ToolArguments};

    #[derive(Debug)]
    struct DivideTool;

    impl Tool for DivideTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::builder("divide")
                .description("Divides a by b")
                .required("a", ParamType::Number)
                .required("b", ParamType::Number)
                .build()
                .expect("definition should be valid")
        }

        fn invoke<'a>(
            &'a self,
            args: ToolArguments,
            _context: &'a ToolExecutionContext,
        ) -> ToolFuture<'a, Result<String, ToolError>> {
            Box::pin(async move {
                let a = args.number("a")?;
                let b = args.number("b")?;
                if b == 0.0 {
                    return Err(ToolError::execution("division by zero"));
                }
                Ok((a / b).to_string())
            })
        }
    }

    fn echo_definition() -> ToolDefinition {
        ToolDefinition::builder("echo")
            .required("text", ParamType::String)
            .build()
            .expect("definition should be valid")
    }

    fn dispatcher() -> ToolDispatcher {
        let mut registry = ToolRegistry::new();
        registry.register(DivideTool).expect("divide registers");
        registry
            .register_sync_fn(echo_definition(), |args, _ctx| {
                Ok(args.string("text")?.to_string())
            })
            .expect("echo registers");
        registry
            .register_sync_fn(
                ToolDefinition::builder("explode").build().expect("valid"),
                |_args, _ctx| panic!("kaboom"),
            )
            .expect("explode registers");

        ToolDispatcher::new(Arc::new(registry))
    }

    fn context() -> ToolExecutionContext {
        ToolExecutionContext::new("session-1")
    }

    #[tokio::test]
    async fn dispatch_returns_success_value() {
        let result = dispatcher()
            .dispatch(ToolCall::new("call_1", "echo", r#"{"text":"hi"}"#), context())
            .await;

        assert_eq!(result.call_id, "call_1");
        assert_eq!(result.value(), Some("hi"));
    }

    #[tokio::test]
    async fn dispatch_converts_unknown_tool_to_error_result() {
        let result = dispatcher()
            .dispatch(ToolCall::new("call_2", "missing", "{}"), context())
            .await;

        assert_eq!(result.error_message(), Some("unknown tool: missing"));
    }

    #[tokio::test]
    async fn dispatch_reports_validation_failure_without_invoking() {
        let invoked = Arc::new(Mutex::new(false));
        let mut registry = ToolRegistry::new();
        {
            let invoked = Arc::clone(&invoked);
            registry
                .register_sync_fn(echo_definition(), move |_args, _ctx| {
                    *invoked.lock().expect("invoked lock") = true;
                    Ok(String::new())
                })
                .expect("echo registers");
        }
        let dispatcher = ToolDispatcher::new(Arc::new(registry));

        let result = dispatcher
            .dispatch(ToolCall::new("call_3", "echo", r#"{"text":5}"#), context())
            .await;

        assert_eq!(
            result.error_message(),
            Some("invalid arguments for tool 'echo': parameter 'text' expects string, got integer")
        );
        assert!(!*invoked.lock().expect("invoked lock"));
    }

    #[tokio::test]
    async fn dispatch_captures_tool_errors_and_panics() {
        let dispatcher = dispatcher();

        let failed = dispatcher
            .dispatch(ToolCall::new("call_4", "divide", r#"{"a":4,"b":0}"#), context())
            .await;
        assert_eq!(
            failed.error_message(),
            Some("tool 'divide' failed: division by zero")
        );

        let panicked = dispatcher
            .dispatch(ToolCall::new("call_5", "explode", "{}"), context())
            .await;
        assert_eq!(
            panicked.error_message(),
            Some("tool 'explode' failed: panicked: kaboom")
        );
    }

    #[tokio::test]
    async fn dispatch_enforces_call_timeout() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn(
                ToolDefinition::builder("sleepy").build().expect("valid"),
                |_args, _ctx| async move {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok("late".to_string())
                },
            )
            .expect("sleepy registers");

        let dispatcher = ToolDispatcher::new(Arc::new(registry))
            .with_policy(DispatchPolicy::default().with_call_timeout(Duration::from_millis(20)))
            .expect("policy should be valid");

        let result = dispatcher
            .dispatch(ToolCall::new("call_6", "sleepy", ""), context())
            .await;
        assert_eq!(
            result.error_message(),
            Some("tool 'sleepy' timed out after 20ms")
        );
    }

    #[tokio::test]
    async fn panic_under_call_timeout_still_becomes_result() {
        let dispatcher = dispatcher()
            .with_policy(DispatchPolicy::default().with_call_timeout(Duration::from_secs(1)))
            .expect("policy should be valid");

        let result = dispatcher
            .dispatch(ToolCall::new("call_7", "explode", "{}"), context())
            .await;
        assert_eq!(result.call_id, "call_7");
        assert_eq!(
            result.error_message(),
            Some("tool 'explode' failed: panicked: kaboom")
        );
    }

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl ToolRuntimeHooks for RecordingHooks {
        fn on_call_start(&self, call: &ToolCall, _context: &ToolExecutionContext) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{}", call.id));
        }

        fn on_call_resolved(
            &self,
            call: &ToolCall,
            _context: &ToolExecutionContext,
            _result: &ToolResult,
            _elapsed: Duration,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("resolved:{}", call.id));
        }

        fn on_call_rejected(
            &self,
            call: &ToolCall,
            _context: &ToolExecutionContext,
            error: &ToolError,
            _elapsed: Duration,
        ) {
            self.events.lock().expect("events lock").push(format!(
                "rejected:{}:{}",
                call.id,
                error.tool_call_id.as_deref().unwrap_or_default()
            ));
        }

        fn on_round_dispatched(
            &self,
            _context: &ToolExecutionContext,
            mode: DispatchMode,
            results: &[ToolResult],
            _elapsed: Duration,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("round:{mode:?}:{}", results.len()));
        }
    }

    #[tokio::test]
    async fn hooks_observe_each_call_and_the_round() {
        let hooks = Arc::new(RecordingHooks::default());
        let dispatcher = dispatcher().with_hooks(hooks.clone());

        let results = dispatcher
            .dispatch_all(
                vec![
                    ToolCall::new("call_0_0", "echo", r#"{"text":"hi"}"#),
                    ToolCall::new("call_0_1", "missing", "{}"),
                ],
                context(),
            )
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(
            *hooks.events.lock().expect("events lock"),
            vec![
                "start:call_0_0",
                "resolved:call_0_0",
                "start:call_0_1",
                "rejected:call_0_1:call_0_1",
                "round:Sequential:2",
            ]
        );
    }

    #[tokio::test]
    async fn concurrent_dispatch_preserves_call_order() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn(
                ToolDefinition::builder("wait")
                    .required("ms", ParamType::Integer)
                    .build()
                    .expect("valid"),
                |args, _ctx| async move {
                    let ms = args.integer("ms")?;
                    tokio::time::sleep(Duration::from_millis(ms as u64)).await;
                    Ok(ms.to_string())
                },
            )
            .expect("wait registers");

        let dispatcher = ToolDispatcher::new(Arc::new(registry))
            .with_policy(DispatchPolicy::concurrent())
            .expect("policy should be valid");

        let results = dispatcher
            .dispatch_all(
                vec![
                    ToolCall::new("slow", "wait", r#"{"ms":60}"#),
                    ToolCall::new("fast", "wait", r#"{"ms":1}"#),
                    ToolCall::new("bad", "missing", "{}"),
                ],
                context(),
            )
            .await;

        let ids = results.iter().map(|r| r.call_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["slow", "fast", "bad"]);
        assert_eq!(results[0].value(), Some("60"));
        assert!(results[2].is_error());
    }

    #[test]
    fn zero_call_timeout_is_rejected() {
        let error = ToolDispatcher::default()
            .with_policy(DispatchPolicy::default().with_call_timeout(Duration::ZERO))
            .err()
            .expect("zero timeout should fail");
        assert_eq!(error.kind, ToolErrorKind::Other);
    }
}
