//! Provider-agnostic transcript, request, and response model types.
//!
//! ```rust
//! use twprovider::{ConversationTurn, ModelRequest, ProviderErrorKind};
//!
//! let ok = ModelRequest::builder("gpt-4o-mini")
//!     .turn(ConversationTurn::user("Summarize this diff"))
//!     .build();
//! assert!(ok.is_ok());
//!
//! let err = ModelRequest::builder("")
//!     .turn(ConversationTurn::user("hi"))
//!     .build()
//!     .err()
//!     .expect("empty model should fail");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//! ```

use std::fmt::{Display, Formatter};

use twcommon::{GenerationOptions, MetadataMap};

use crate::{ProviderError, ToolDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
    Tool,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        };

        f.write_str(role)
    }
}

/// A model-emitted request to invoke a tool.
///
/// `arguments` is the raw payload exactly as the model produced it; it is
/// only interpreted by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Value(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub call_id: String,
    pub outcome: ToolOutcome,
}

impl ToolResult {
    pub fn success(call_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            outcome: ToolOutcome::Value(value.into()),
        }
    }

    pub fn error(call_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            outcome: ToolOutcome::Error(message.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Value(value) => Some(value),
            ToolOutcome::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Value(_) => None,
            ToolOutcome::Error(message) => Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Error(_))
    }

    /// Text fed back to the model for this result.
    pub fn content(&self) -> &str {
        match &self.outcome {
            ToolOutcome::Value(value) => value,
            ToolOutcome::Error(message) => message,
        }
    }
}

/// One role-attributed transcript entry.
///
/// Calls are only ever attached to assistant turns and results only to tool
/// turns; the constructors are the only way to build a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    role: Role,
    content: String,
    calls: Vec<ToolCall>,
    results: Vec<ToolResult>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            calls: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            calls,
            results: Vec::new(),
        }
    }

    pub fn tool(results: Vec<ToolResult>) -> Self {
        Self {
            role: Role::Tool,
            content: String::new(),
            calls: Vec::new(),
            results,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn calls(&self) -> &[ToolCall] {
        &self.calls
    }

    pub fn results(&self) -> &[ToolResult] {
        &self.results
    }

    pub fn has_calls(&self) -> bool {
        !self.calls.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    Text(String),
    ToolCall(ToolCall),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ToolUse,
    Cancelled,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn accumulate(&mut self, other: TokenUsage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    pub model: String,
    pub output: Vec<OutputItem>,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

impl ModelResponse {
    pub fn text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Text(text) => Some(text.as_str()),
                OutputItem::ToolCall(_) => None,
            })
            .collect()
    }

    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::ToolCall(call) => Some(call.clone()),
                OutputItem::Text(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub turns: Vec<ConversationTurn>,
    pub tools: Vec<ToolDefinition>,
    pub options: GenerationOptions,
    pub metadata: MetadataMap,
}

impl ModelRequest {
    pub fn builder(model: impl Into<String>) -> ModelRequestBuilder {
        ModelRequestBuilder::new(model)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.turns.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one conversation turn is required",
            ));
        }

        if let Some(max_tokens) = self.options.max_tokens
            && max_tokens == 0
        {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if let Some(temperature) = self.options.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ProviderError::invalid_request(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        Ok(())
    }

    /// Results from the most recent tool turn, if the transcript ends with one.
    pub fn pending_tool_results(&self) -> &[ToolResult] {
        match self.turns.last() {
            Some(turn) if turn.role() == Role::Tool => turn.results(),
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequestBuilder {
    model: String,
    system_prompt: Option<String>,
    turns: Vec<ConversationTurn>,
    tools: Vec<ToolDefinition>,
    options: GenerationOptions,
    metadata: MetadataMap,
}

impl ModelRequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            turns: Vec::new(),
            tools: Vec::new(),
            options: GenerationOptions::default(),
            metadata: MetadataMap::new(),
        }
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn turn(mut self, turn: ConversationTurn) -> Self {
        self.turns.push(turn);
        self
    }

    pub fn turns(mut self, turns: impl IntoIterator<Item = ConversationTurn>) -> Self {
        self.turns.extend(turns);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<ModelRequest, ProviderError> {
        let request = ModelRequest {
            model: self.model,
            system_prompt: self.system_prompt,
            turns: self.turns,
            tools: self.tools,
            options: self.options,
            metadata: self.metadata,
        };

        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_result_exposes_exactly_one_outcome() {
        let ok = ToolResult::success("call_1", "42");
        assert_eq!(ok.value(), Some("42"));
        assert_eq!(ok.error_message(), None);
        assert!(!ok.is_error());

        let failed = ToolResult::error("call_2", "division by zero");
        assert_eq!(failed.value(), None);
        assert_eq!(failed.error_message(), Some("division by zero"));
        assert_eq!(failed.content(), "division by zero");
    }

    #[test]
    fn turn_constructors_attach_only_role_appropriate_payloads() {
        let assistant =
            ConversationTurn::assistant("", vec![ToolCall::new("c1", "echo", "{}")]);
        assert_eq!(assistant.role(), Role::Assistant);
        assert!(assistant.has_calls());
        assert!(assistant.results().is_empty());

        let tool = ConversationTurn::tool(vec![ToolResult::success("c1", "ok")]);
        assert_eq!(tool.role(), Role::Tool);
        assert!(tool.calls().is_empty());
        assert_eq!(tool.results().len(), 1);
        assert_eq!(tool.content(), "");
    }

    #[test]
    fn request_builder_validates_generation_options() {
        let error = ModelRequest::builder("gpt-4o-mini")
            .turn(ConversationTurn::user("hi"))
            .options(GenerationOptions::default().with_temperature(3.0))
            .build()
            .expect_err("temperature should be rejected");
        assert!(error.message.contains("temperature"));

        let error = ModelRequest::builder("gpt-4o-mini")
            .build()
            .expect_err("empty transcript should be rejected");
        assert_eq!(error.message, "at least one conversation turn is required");
    }

    #[test]
    fn pending_tool_results_reads_trailing_tool_turn() {
        let request = ModelRequest::builder("gpt-4o-mini")
            .turn(ConversationTurn::user("go"))
            .turn(ConversationTurn::assistant(
                "",
                vec![ToolCall::new("c1", "echo", "{}")],
            ))
            .turn(ConversationTurn::tool(vec![ToolResult::success("c1", "hi")]))
            .build()
            .expect("request should build");

        assert_eq!(request.pending_tool_results().len(), 1);
        assert_eq!(request.pending_tool_results()[0].call_id, "c1");
    }

    #[test]
    fn response_splits_text_and_tool_calls() {
        let response = ModelResponse {
            model: "m".to_string(),
            output: vec![
                OutputItem::Text("hello ".to_string()),
                OutputItem::ToolCall(ToolCall::new("c1", "echo", "{}")),
                OutputItem::Text("world".to_string()),
            ],
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage::default(),
        };

        assert_eq!(response.text(), "hello world");
        assert_eq!(response.tool_calls().len(), 1);
    }
}
