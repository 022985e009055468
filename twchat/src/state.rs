//! Append-only conversation transcript owned by the caller.
//!
//! ```rust
//! use twchat::ConversationState;
//! use twprovider::Role;
//!
//! let state = ConversationState::with_prompt("What is 6 x 7?");
//! assert_eq!(state.len(), 1);
//! assert_eq!(state.turns()[0].role(), Role::User);
//! assert_eq!(state.final_answer(), None);
//! ```

use twprovider::{ConversationTurn, Role};

/// Ordered transcript of turns.
///
/// Callers may seed user turns between runs; while a run holds the state
/// mutably only the loop appends, and nothing is ever removed or rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationState {
    turns: Vec<ConversationTurn>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.push_user(prompt);
        state
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ConversationTurn::user(content));
    }

    pub(crate) fn append(&mut self, turn: ConversationTurn) -> &ConversationTurn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Text of the most recent assistant turn, if that turn carried no calls.
    pub fn final_answer(&self) -> Option<&str> {
        self.turns
            .last()
            .filter(|turn| turn.role() == Role::Assistant && !turn.has_calls())
            .map(ConversationTurn::content)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
