//! Session settings and loop outcome types.

use twcommon::{GenerationOptions, MetadataMap, SessionId, TraceId};
use twprovider::{StopReason, TokenUsage};

/// Per-conversation settings sent with every generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub id: SessionId,
    pub model: String,
    pub system_prompt: Option<String>,
    pub trace_id: Option<TraceId>,
    pub options: GenerationOptions,
    pub metadata: MetadataMap,
}

impl ChatSession {
    pub fn new(id: impl Into<SessionId>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            system_prompt: None,
            trace_id: None,
            options: GenerationOptions::default(),
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Successful termination of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    /// Text of the final, calls-free assistant turn.
    pub final_answer: String,
    /// Tool rounds completed before the final answer.
    pub rounds: u32,
    pub stop_reason: StopReason,
    /// Usage summed over every generation in the run.
    pub usage: TokenUsage,
}
