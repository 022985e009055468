//! Model invocation errors.
//!
//! The `retryable` flag is read by [`RetryPolicy`](crate::RetryPolicy) when a
//! stream cannot be opened; the orchestration loop itself never retries.
//!
//! ```rust
//! use twprovider::{ProviderError, ProviderErrorKind};
//!
//! let overloaded = ProviderError::unavailable("upstream overloaded");
//! assert!(overloaded.retryable);
//!
//! let rejected = ProviderError::invalid_request("model must not be empty");
//! assert_eq!(rejected.kind, ProviderErrorKind::InvalidRequest);
//! assert!(!rejected.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    InvalidRequest,
    RateLimited,
    Timeout,
    Transport,
    Unavailable,
    /// The producer failed after it had started emitting fragments.
    Stream,
    Other,
}

impl ProviderErrorKind {
    /// Whether a fresh attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Timeout | Self::Transport | Self::Unavailable
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    /// Builds an error whose retryability follows its kind.
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: kind.is_transient(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    pub fn stream(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Stream, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}
