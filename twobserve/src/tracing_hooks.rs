//! Tracing-based hooks for provider retries, tool dispatch, and loop phases.
//!
//! ```rust
//! use twchat::LoopRuntimeHooks;
//! use twobserve::TracingObservabilityHooks;
//!
//! fn accepts_loop_hooks(_hooks: &dyn LoopRuntimeHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_loop_hooks(&hooks);
//! ```

use std::time::Duration;

use twchat::{ChatError, LoopPhase, LoopRuntimeHooks};
use twcommon::SessionId;
use twprovider::{ProviderError, ProviderOperationHooks, ToolCall, ToolResult};
use twtooling::{DispatchMode, ToolError, ToolExecutionContext, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: &str, operation: &str, attempt: u32) {
        tracing::info!(
            phase = "provider",
            event = "attempt_start",
            provider,
            operation,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        provider: &str,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "provider",
            event = "retry_scheduled",
            provider,
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_success(&self, provider: &str, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider,
            operation,
            attempts
        );
    }

    fn on_failure(&self, provider: &str, operation: &str, attempts: u32, error: &ProviderError) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_call_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "call_start",
            tool_name = %tool_call.name,
            tool_call_id = %tool_call.id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            round = context.round
        );
    }

    fn on_call_resolved(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "call_resolved",
            tool_name = %tool_call.name,
            tool_call_id = %tool_call.id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            round = context.round,
            output_len = result.content().len(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_call_rejected(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        // Tool failures are fed back to the model, so they are warnings here.
        tracing::warn!(
            phase = "tool",
            event = "call_rejected",
            tool_name = %tool_call.name,
            tool_call_id = %tool_call.id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            round = context.round,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            request_fault = error.kind.is_request_fault(),
            error = %error
        );
    }

    fn on_round_dispatched(
        &self,
        context: &ToolExecutionContext,
        mode: DispatchMode,
        results: &[ToolResult],
        elapsed: Duration,
    ) {
        tracing::debug!(
            phase = "tool",
            event = "round_dispatched",
            session_id = %context.session_id,
            round = context.round,
            mode = ?mode,
            calls = results.len(),
            errors = results.iter().filter(|result| result.is_error()).count(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }
}

impl LoopRuntimeHooks for TracingObservabilityHooks {
    fn on_phase(&self, phase: LoopPhase, session_id: &SessionId, round: u32) {
        tracing::debug!(
            phase = "loop",
            event = "phase",
            loop_phase = %phase,
            session_id = %session_id,
            round
        );
    }

    fn on_round_complete(
        &self,
        session_id: &SessionId,
        round: u32,
        tool_calls: usize,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "loop",
            event = "round_complete",
            session_id = %session_id,
            round,
            tool_calls,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_loop_success(&self, session_id: &SessionId, rounds: u32, elapsed: Duration) {
        tracing::info!(
            phase = "loop",
            event = "done",
            session_id = %session_id,
            rounds,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_loop_failure(&self, session_id: &SessionId, error: &ChatError, elapsed: Duration) {
        tracing::error!(
            phase = "loop",
            event = "aborted",
            session_id = %session_id,
            rounds = error.rounds_completed,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}
