//! Metrics-based hooks for provider retries, tool dispatch, and loop phases.
//!
//! ```rust
//! use twobserve::MetricsObservabilityHooks;
//! use twtooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use twchat::{ChatError, LoopPhase, LoopRuntimeHooks};
use twcommon::SessionId;
use twprovider::{ProviderError, ProviderOperationHooks, ToolCall, ToolResult};
use twtooling::{DispatchMode, ToolError, ToolExecutionContext, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: &str, operation: &str, _attempt: u32) {
        metrics::counter!(
            "toolweave_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        provider: &str,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "toolweave_provider_retry_scheduled_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "toolweave_provider_retry_delay_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, provider: &str, operation: &str, attempts: u32) {
        metrics::histogram!(
            "toolweave_provider_attempts_per_success",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(&self, provider: &str, operation: &str, _attempts: u32, error: &ProviderError) {
        metrics::counter!(
            "toolweave_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_call_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!(
            "toolweave_tool_dispatch_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_call_resolved(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolResult,
        elapsed: Duration,
    ) {
        metrics::histogram!(
            "toolweave_tool_dispatch_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_call_rejected(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "toolweave_tool_dispatch_failure_total",
            "tool_name" => tool_call.name.clone(),
            "error_kind" => format!("{:?}", error.kind),
            "fault" => if error.kind.is_request_fault() { "request" } else { "tool" }
        )
        .increment(1);
        metrics::histogram!(
            "toolweave_tool_dispatch_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_round_dispatched(
        &self,
        _context: &ToolExecutionContext,
        mode: DispatchMode,
        results: &[ToolResult],
        elapsed: Duration,
    ) {
        let mode = match mode {
            DispatchMode::Sequential => "sequential",
            DispatchMode::Concurrent => "concurrent",
        };
        metrics::histogram!("toolweave_tool_round_calls", "mode" => mode)
            .record(results.len() as f64);
        metrics::histogram!("toolweave_tool_round_duration_seconds", "mode" => mode)
            .record(elapsed.as_secs_f64());
    }
}

impl LoopRuntimeHooks for MetricsObservabilityHooks {
    fn on_phase(&self, phase: LoopPhase, _session_id: &SessionId, _round: u32) {
        metrics::counter!("toolweave_loop_phase_total", "phase" => phase.as_str()).increment(1);
    }

    fn on_round_complete(
        &self,
        _session_id: &SessionId,
        _round: u32,
        tool_calls: usize,
        elapsed: Duration,
    ) {
        metrics::histogram!("toolweave_loop_round_duration_seconds").record(elapsed.as_secs_f64());
        metrics::histogram!("toolweave_loop_calls_per_round").record(tool_calls as f64);
    }

    fn on_loop_success(&self, _session_id: &SessionId, rounds: u32, elapsed: Duration) {
        metrics::counter!("toolweave_loop_runs_total", "outcome" => "done").increment(1);
        metrics::histogram!("toolweave_loop_rounds_per_run").record(rounds as f64);
        metrics::histogram!("toolweave_loop_run_duration_seconds", "outcome" => "done")
            .record(elapsed.as_secs_f64());
    }

    fn on_loop_failure(&self, _session_id: &SessionId, error: &ChatError, elapsed: Duration) {
        metrics::counter!(
            "toolweave_loop_runs_total",
            "outcome" => "aborted",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!("toolweave_loop_run_duration_seconds", "outcome" => "aborted")
            .record(elapsed.as_secs_f64());
    }
}
