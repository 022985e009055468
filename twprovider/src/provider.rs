//! Model invocation contract consumed by the orchestration loop.

use std::future::Future;
use std::pin::Pin;

use crate::{BoxedEventStream, ModelRequest, ProviderError};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How a producer frames tool calls in its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallFraming {
    /// Calls arrive as `ToolCallDelta` events or in the final response.
    #[default]
    StructuredChannel,
    /// Calls are embedded as directives inside the generated text.
    TextEmbedded,
}

pub trait ModelProvider: Send + Sync {
    fn name(&self) -> &str;

    fn call_framing(&self) -> CallFraming {
        CallFraming::StructuredChannel
    }

    fn stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>>;
}
