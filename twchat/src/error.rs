//! Loop-level errors. Tool failures never appear here; they are tool results.

use std::error::Error;
use std::fmt::{Display, Formatter};

use twprovider::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    ModelInvocation,
    GenerationTimeout,
    RoundLimitExceeded,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    /// Tool rounds fully appended before the loop stopped.
    pub rounds_completed: u32,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            rounds_completed: 0,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn model_invocation(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::ModelInvocation, message)
    }

    pub fn generation_timeout(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::GenerationTimeout, message)
    }

    pub fn round_limit_exceeded(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::RoundLimitExceeded, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Cancelled, message)
    }

    pub fn with_rounds_completed(mut self, rounds_completed: u32) -> Self {
        self.rounds_completed = rounds_completed;
        self
    }

    /// True for the two outcomes the loop chooses itself rather than suffers.
    pub fn is_aborted(&self) -> bool {
        matches!(
            self.kind,
            ChatErrorKind::RoundLimitExceeded | ChatErrorKind::Cancelled
        )
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} after {} rounds: {}",
            self.kind, self.rounds_completed, self.message
        )
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        ChatError::model_invocation(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_become_model_invocation_errors() {
        let error = ChatError::from(ProviderError::unavailable("overloaded"));
        assert_eq!(error.kind, ChatErrorKind::ModelInvocation);
        assert!(error.message.contains("overloaded"));
        assert!(!error.is_aborted());
    }

    #[test]
    fn display_includes_kind_and_progress() {
        let error = ChatError::cancelled("stop requested").with_rounds_completed(2);
        assert!(error.is_aborted());
        assert_eq!(error.to_string(), "Cancelled after 2 rounds: stop requested");
    }
}
