//! Registration and dispatch errors.
//!
//! Dispatch never surfaces these to the loop: the dispatcher renders them
//! into error [`ToolResult`](twprovider::ToolResult)s. Only registration and
//! policy validation return them directly.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    DuplicateTool,
    InvalidDefinition,
    NotFound,
    InvalidArguments,
    Execution,
    Timeout,
    Other,
}

impl ToolErrorKind {
    /// Kinds caused by what the model asked for rather than by the tool.
    pub fn is_request_fault(&self) -> bool {
        matches!(self, Self::NotFound | Self::InvalidArguments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
    pub tool_call_id: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
            tool_call_id: None,
        }
    }

    pub fn duplicate_tool(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::DuplicateTool, message)
    }

    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidDefinition, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Other, message)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.kind)?;
        match (&self.tool_name, &self.tool_call_id) {
            (Some(name), Some(call_id)) => write!(f, " [tool={name}, call_id={call_id}]")?,
            (Some(name), None) => write!(f, " [tool={name}]")?,
            (None, Some(call_id)) => write!(f, " [call_id={call_id}]")?,
            (None, None) => {}
        }
        write!(f, ": {}", self.message)
    }
}

impl Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_faults_are_distinguished_from_tool_faults() {
        assert!(ToolErrorKind::NotFound.is_request_fault());
        assert!(ToolErrorKind::InvalidArguments.is_request_fault());
        assert!(!ToolErrorKind::Execution.is_request_fault());
        assert!(!ToolErrorKind::Timeout.is_request_fault());
    }

    #[test]
    fn display_names_the_tool_and_call_when_known() {
        let error = ToolError::not_found("unknown tool: lookup")
            .with_tool_name("lookup")
            .with_tool_call_id("call_1");
        assert_eq!(
            error.to_string(),
            "NotFound [tool=lookup, call_id=call_1]: unknown tool: lookup"
        );

        let bare = ToolError::other("call_timeout must be greater than zero");
        assert_eq!(bare.to_string(), "Other: call_timeout must be greater than zero");
    }
}
