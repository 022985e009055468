//! Fragment and turn observer contracts.
//!
//! Observers run synchronously on the loop's control flow; the next fragment
//! is not polled until every fragment observer has returned, so observers
//! must not block indefinitely.
//!
//! ```rust
//! use twchat::TranscriptRecorder;
//! use twprovider::ConversationTurn;
//!
//! let recorder = TranscriptRecorder::new();
//! let observer = recorder.observer();
//! observer(&ConversationTurn::assistant("done", Vec::new()));
//! assert_eq!(recorder.len(), 1);
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use twprovider::ConversationTurn;

/// One streamed unit of generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub round: u32,
}

pub type FragmentObserver = Arc<dyn Fn(&Fragment) + Send + Sync>;

/// Invoked once per assistant or tool turn as it is appended.
pub type TurnObserver = Arc<dyn Fn(&ConversationTurn) + Send + Sync>;

/// In-memory turn observer that keeps a copy of every appended turn.
#[derive(Debug, Clone, Default)]
pub struct TranscriptRecorder {
    turns: Arc<Mutex<Vec<ConversationTurn>>>,
}

impl TranscriptRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observer(&self) -> TurnObserver {
        let recorder = self.clone();
        Arc::new(move |turn: &ConversationTurn| recorder.lock().push(turn.clone()))
    }

    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking observer elsewhere must not hide the turns recorded so far.
    fn lock(&self) -> MutexGuard<'_, Vec<ConversationTurn>> {
        self.turns
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use twprovider::{Role, ToolResult};

    use super::*;

    #[test]
    fn recorder_keeps_turns_in_append_order() {
        let recorder = TranscriptRecorder::new();
        let observer = recorder.observer();

        observer(&ConversationTurn::assistant("", Vec::new()));
        observer(&ConversationTurn::tool(vec![ToolResult::success("c1", "ok")]));

        let roles = recorder.turns().iter().map(|t| t.role()).collect::<Vec<_>>();
        assert_eq!(roles, vec![Role::Assistant, Role::Tool]);
        assert!(!recorder.is_empty());
    }
}
