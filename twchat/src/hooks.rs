//! Runtime hooks for orchestration loop phases.
//!
//! ```rust
//! use twchat::{LoopPhase, LoopRuntimeHooks, NoopLoopRuntimeHooks};
//!
//! fn accepts_hooks(_hooks: &dyn LoopRuntimeHooks) {}
//!
//! let hooks = NoopLoopRuntimeHooks;
//! accepts_hooks(&hooks);
//! assert_eq!(LoopPhase::Dispatching.as_str(), "dispatching");
//! ```

use std::fmt::{Display, Formatter};
use std::time::Duration;

use twcommon::SessionId;

use crate::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopPhase {
    Generate,
    Streaming,
    Parse,
    Dispatching,
    Append,
    Done,
    Aborted,
}

impl LoopPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Streaming => "streaming",
            Self::Parse => "parse",
            Self::Dispatching => "dispatching",
            Self::Append => "append",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl Display for LoopPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait LoopRuntimeHooks: Send + Sync {
    fn on_phase(&self, _phase: LoopPhase, _session_id: &SessionId, _round: u32) {}

    fn on_round_complete(
        &self,
        _session_id: &SessionId,
        _round: u32,
        _tool_calls: usize,
        _elapsed: Duration,
    ) {
    }

    fn on_loop_success(&self, _session_id: &SessionId, _rounds: u32, _elapsed: Duration) {}

    fn on_loop_failure(&self, _session_id: &SessionId, _error: &ChatError, _elapsed: Duration) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLoopRuntimeHooks;

impl LoopRuntimeHooks for NoopLoopRuntimeHooks {}
