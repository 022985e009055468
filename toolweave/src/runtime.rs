//! Runtime wiring helpers for the orchestration loop.

use std::sync::Arc;

use crate::{
    ChatError, ChatPolicy, ChatService, DispatchPolicy, ModelProvider, RetryPolicy,
    RetryingProvider, SafeLoopHooks, SafeProviderHooks, SafeToolHooks, ToolDispatcher,
    ToolRegistry, TracingObservabilityHooks,
};

/// A loop over `registry` with default policies and no observability.
pub fn chat_service(
    provider: Arc<dyn ModelProvider>,
    registry: Arc<ToolRegistry>,
) -> Result<ChatService, ChatError> {
    ChatService::builder(provider).registry(registry).build()
}

/// A loop whose dispatcher and phases report through `tracing`.
///
/// Hooks are wrapped so a panicking subscriber cannot abort a run.
pub fn observed_chat_service(
    provider: Arc<dyn ModelProvider>,
    registry: Arc<ToolRegistry>,
    policy: ChatPolicy,
    dispatch: DispatchPolicy,
) -> Result<ChatService, ChatError> {
    let dispatcher = ToolDispatcher::new(registry)
        .with_policy(dispatch)
        .map_err(|error| ChatError::invalid_request(error.to_string()))?
        .with_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)));

    ChatService::builder(provider)
        .tool_runtime(Arc::new(dispatcher))
        .policy(policy)
        .hooks(Arc::new(SafeLoopHooks::new(TracingObservabilityHooks)))
        .build()
}

pub fn observed_provider<P>(provider: P, retry: RetryPolicy) -> RetryingProvider<P>
where
    P: ModelProvider,
{
    RetryingProvider::new(provider, retry)
        .with_hooks(Arc::new(SafeProviderHooks::new(TracingObservabilityHooks)))
}
