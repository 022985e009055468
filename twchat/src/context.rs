//! Per-run loop bookkeeping and caller-side cancellation.
//!
//! ```rust
//! use twchat::CancelHandle;
//!
//! let handle = CancelHandle::new();
//! let shared = handle.clone();
//! shared.cancel();
//! assert!(handle.is_cancelled());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shareable cancellation flag.
///
/// Cancellation is coarse-grained: the loop checks the flag after appending
/// a round's tool results, so an in-flight generation or dispatch always
/// finishes first.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Created fresh for every run and dropped when the run terminates.
#[derive(Debug, Clone)]
pub struct LoopContext {
    round_number: u32,
    max_rounds: u32,
    cancel: CancelHandle,
}

impl LoopContext {
    pub fn new(max_rounds: u32, cancel: CancelHandle) -> Self {
        Self {
            round_number: 0,
            max_rounds,
            cancel,
        }
    }

    /// Completed generate-then-dispatch cycles.
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_exhausted(&self) -> bool {
        self.round_number >= self.max_rounds
    }

    pub(crate) fn advance(&mut self) -> u32 {
        self.round_number += 1;
        self.round_number
    }
}
