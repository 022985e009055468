//! Wrappers that keep a panicking hook from unwinding into the loop.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use twchat::{ChatError, LoopPhase, LoopRuntimeHooks};
use twcommon::SessionId;
use twprovider::{ProviderError, ProviderOperationHooks, ToolCall, ToolResult};
use twtooling::{DispatchMode, ToolError, ToolExecutionContext, ToolRuntimeHooks};

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(&self, provider: &str, operation: &str, attempt: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(provider, operation, attempt)
        }));
    }

    fn on_retry_scheduled(
        &self,
        provider: &str,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_retry_scheduled(provider, operation, attempt, delay, error)
        }));
    }

    fn on_success(&self, provider: &str, operation: &str, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, attempts)
        }));
    }

    fn on_failure(&self, provider: &str, operation: &str, attempts: u32, error: &ProviderError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, attempts, error)
        }));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_call_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_start(tool_call, context)
        }));
    }

    fn on_call_resolved(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_call_resolved(tool_call, context, result, elapsed)
        }));
    }

    fn on_call_rejected(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_call_rejected(tool_call, context, error, elapsed)
        }));
    }

    fn on_round_dispatched(
        &self,
        context: &ToolExecutionContext,
        mode: DispatchMode,
        results: &[ToolResult],
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_round_dispatched(context, mode, results, elapsed)
        }));
    }
}

pub struct SafeLoopHooks<H> {
    inner: H,
}

impl<H> SafeLoopHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> LoopRuntimeHooks for SafeLoopHooks<H>
where
    H: LoopRuntimeHooks,
{
    fn on_phase(&self, phase: LoopPhase, session_id: &SessionId, round: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_phase(phase, session_id, round)
        }));
    }

    fn on_round_complete(
        &self,
        session_id: &SessionId,
        round: u32,
        tool_calls: usize,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_round_complete(session_id, round, tool_calls, elapsed)
        }));
    }

    fn on_loop_success(&self, session_id: &SessionId, rounds: u32, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_loop_success(session_id, rounds, elapsed)
        }));
    }

    fn on_loop_failure(&self, session_id: &SessionId, error: &ChatError, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_loop_failure(session_id, error, elapsed)
        }));
    }
}
