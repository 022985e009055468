//! Observability hooks for provider retries, tool dispatch, and loop phases.
//!
//! ```rust
//! use twobserve::{
//!     MetricsObservabilityHooks, SafeLoopHooks, SafeProviderHooks, TracingObservabilityHooks,
//! };
//!
//! let _provider_hooks = SafeProviderHooks::new(TracingObservabilityHooks);
//! let _loop_hooks = SafeLoopHooks::new(MetricsObservabilityHooks);
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeLoopHooks, SafeProviderHooks, SafeToolHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeLoopHooks, SafeProviderHooks, SafeToolHooks,
        TracingObservabilityHooks,
    };
}
