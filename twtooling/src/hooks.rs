//! Callbacks fired by [`ToolDispatcher`](crate::ToolDispatcher) as it resolves
//! a round of calls.
//!
//! Every call gets `on_call_start` followed by exactly one of
//! `on_call_resolved` or `on_call_rejected`. Rejections include lookup and
//! validation failures, tool errors, panics, and timeouts; the model still
//! receives a result for each of them. `on_round_dispatched` fires once per
//! `dispatch_all`, after every result is in.
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use twprovider::{ToolCall, ToolResult};
//! use twtooling::{ToolExecutionContext, ToolRuntimeHooks};
//!
//! #[derive(Default)]
//! struct CountResolved(AtomicUsize);
//!
//! impl ToolRuntimeHooks for CountResolved {
//!     fn on_call_resolved(
//!         &self,
//!         _call: &ToolCall,
//!         _context: &ToolExecutionContext,
//!         _result: &ToolResult,
//!         _elapsed: std::time::Duration,
//!     ) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! let hooks = CountResolved::default();
//! hooks.on_call_resolved(
//!     &ToolCall::new("call_0_0", "echo", "{}"),
//!     &ToolExecutionContext::new("session-1"),
//!     &ToolResult::success("call_0_0", "ok"),
//!     std::time::Duration::ZERO,
//! );
//! assert_eq!(hooks.0.load(Ordering::Relaxed), 1);
//! ```

use std::time::Duration;

use twprovider::{ToolCall, ToolResult};

use crate::{DispatchMode, ToolError, ToolExecutionContext};

pub trait ToolRuntimeHooks: Send + Sync {
    fn on_call_start(&self, _call: &ToolCall, _context: &ToolExecutionContext) {}

    /// The tool ran and returned a value.
    fn on_call_resolved(
        &self,
        _call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolResult,
        _elapsed: Duration,
    ) {
    }

    /// `error` carries the tool name and call id.
    fn on_call_rejected(
        &self,
        _call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
    }

    fn on_round_dispatched(
        &self,
        _context: &ToolExecutionContext,
        _mode: DispatchMode,
        _results: &[ToolResult],
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToolRuntimeHooks;

impl ToolRuntimeHooks for NoopToolRuntimeHooks {}
