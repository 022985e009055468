//! Tool-call recognition for one completed generation round.
//!
//! Producers frame calls differently, so parsing is polymorphic: one
//! [`ToolCallParser`] contract with a text-embedded and a structured-channel
//! variant, chosen from the producer's [`CallFraming`].
//!
//! ```rust
//! use twchat::{RoundOutput, TextEmbeddedFormat, ToolCallParser};
//!
//! let parsed = TextEmbeddedFormat.parse(RoundOutput::text(
//!     0,
//!     r#"Checking. <tool_call>{"name":"echo","arguments":{"text":"hi"}}</tool_call>"#,
//! ));
//!
//! assert_eq!(parsed.remainder, "Checking.");
//! assert_eq!(parsed.calls[0].name, "echo");
//! assert_eq!(parsed.calls[0].arguments, r#"{"text":"hi"}"#);
//! assert_eq!(parsed.calls[0].id, "call_0_0");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use twprovider::{CallFraming, ToolCall};

const OPEN_TAG: &str = "<tool_call";
const CLOSE_TAG: &str = "</tool_call>";

/// Everything a producer emitted for one round, fragments already joined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundOutput {
    pub round: u32,
    pub text: String,
    pub structured_calls: Vec<ToolCall>,
}

impl RoundOutput {
    pub fn text(round: u32, text: impl Into<String>) -> Self {
        Self {
            round,
            text: text.into(),
            structured_calls: Vec::new(),
        }
    }

    pub fn with_calls(mut self, calls: Vec<ToolCall>) -> Self {
        self.structured_calls = calls;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRound {
    /// Recognized calls in order of appearance, each with a round-unique id.
    pub calls: Vec<ToolCall>,
    /// Plain text outside any directive, trimmed.
    pub remainder: String,
}

impl ParsedRound {
    pub fn is_terminal(&self) -> bool {
        self.calls.is_empty()
    }
}

pub trait ToolCallParser: Send + Sync {
    /// Never fails: malformed directives surface as calls that fail validation.
    fn parse(&self, output: RoundOutput) -> ParsedRound;
}

/// Calls embedded in generated text as `<tool_call>` directives.
///
/// Two body forms are accepted: a JSON envelope
/// `{"name": .., "arguments": {..} | "<json>", "id": ..}` and an attribute
/// form `<tool_call name="echo" id="c1">{"text":"hi"}</tool_call>` whose body
/// is the raw argument payload. An opening tag with no closing tag is left
/// as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEmbeddedFormat;

impl ToolCallParser for TextEmbeddedFormat {
    fn parse(&self, output: RoundOutput) -> ParsedRound {
        let mut calls = Vec::new();
        let mut remainder = String::new();
        let mut rest = output.text.as_str();

        while let Some(start) = find_open_tag(rest) {
            let after_open = &rest[start + OPEN_TAG.len()..];
            let Some(tag_end) = after_open.find('>') else {
                break;
            };
            let body_and_rest = &after_open[tag_end + 1..];
            let Some(close) = body_and_rest.find(CLOSE_TAG) else {
                break;
            };

            remainder.push_str(&rest[..start]);
            calls.push(directive_call(
                &after_open[..tag_end],
                &body_and_rest[..close],
            ));
            rest = &body_and_rest[close + CLOSE_TAG.len()..];
        }
        remainder.push_str(rest);

        ParsedRound {
            calls: assign_call_ids(calls, output.round),
            remainder: remainder.trim().to_string(),
        }
    }
}

/// Calls delivered out-of-band by the producer; the text is all remainder.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredChannelFormat;

impl ToolCallParser for StructuredChannelFormat {
    fn parse(&self, output: RoundOutput) -> ParsedRound {
        ParsedRound {
            calls: assign_call_ids(output.structured_calls, output.round),
            remainder: output.text.trim().to_string(),
        }
    }
}

pub fn parser_for(framing: CallFraming) -> Arc<dyn ToolCallParser> {
    match framing {
        CallFraming::StructuredChannel => Arc::new(StructuredChannelFormat),
        CallFraming::TextEmbedded => Arc::new(TextEmbeddedFormat),
    }
}

pub fn local_call_id(round: u32, index: usize) -> String {
    format!("call_{round}_{index}")
}

// Missing or repeated ids are replaced so results correlate unambiguously.
fn assign_call_ids(calls: Vec<ToolCall>, round: u32) -> Vec<ToolCall> {
    let mut seen = HashSet::new();
    calls
        .into_iter()
        .enumerate()
        .map(|(index, mut call)| {
            if call.id.trim().is_empty() || !seen.insert(call.id.clone()) {
                let base = local_call_id(round, index);
                let mut candidate = base.clone();
                let mut suffix = 1;
                while !seen.insert(candidate.clone()) {
                    candidate = format!("{base}_{suffix}");
                    suffix += 1;
                }
                call.id = candidate;
            }
            call
        })
        .collect()
}

fn find_open_tag(text: &str) -> Option<usize> {
    text.match_indices(OPEN_TAG).map(|(index, _)| index).find(|index| {
        text[index + OPEN_TAG.len()..]
            .chars()
            .next()
            .is_some_and(|next| next == '>' || next.is_whitespace())
    })
}

fn directive_call(attributes: &str, body: &str) -> ToolCall {
    let attribute_id = attribute(attributes, "id").unwrap_or_default();
    if let Some(name) = attribute(attributes, "name") {
        return ToolCall::new(attribute_id, name, body.trim());
    }

    match serde_json::from_str::<Value>(body.trim()) {
        Ok(Value::Object(mut envelope)) => {
            let name = envelope
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let id = match attribute_id {
                "" => envelope
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                id => id.to_string(),
            };
            let arguments = match envelope
                .remove("arguments")
                .or_else(|| envelope.remove("parameters"))
            {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(raw)) => raw,
                Some(other) => other.to_string(),
            };
            ToolCall::new(id, name, arguments)
        }
        _ => ToolCall::new(
            attribute_id,
            recover_name(body).unwrap_or_default(),
            body.trim(),
        ),
    }
}

fn attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    let mut rest = attributes;
    while let Some(equals) = rest.find('=') {
        let name = rest[..equals].trim();
        let after = rest[equals + 1..].trim_start();
        let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let value = &after[1..];
        let end = value.find(quote)?;
        if name == key {
            return Some(&value[..end]);
        }
        rest = &value[end + 1..];
    }
    None
}

// Best effort for bodies that are not valid JSON but still name a tool.
fn recover_name(body: &str) -> Option<String> {
    let key = body.find("\"name\"")?;
    let value = body[key + "\"name\"".len()..]
        .trim_start()
        .strip_prefix(':')?
        .trim_start()
        .strip_prefix('"')?;
    let end = value.find('"')?;
    Some(value[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_text(text: &str) -> ParsedRound {
        TextEmbeddedFormat.parse(RoundOutput::text(2, text))
    }

    #[test]
    fn plain_text_is_terminal() {
        let parsed = parse_text("  The answer is 42.\n");
        assert!(parsed.is_terminal());
        assert_eq!(parsed.remainder, "The answer is 42.");
    }

    #[test]
    fn multiple_directives_are_recognized_in_order() {
        let parsed = parse_text(concat!(
            "First ",
            r#"<tool_call>{"name":"a","arguments":{"x":1},"id":"k1"}</tool_call>"#,
            " then ",
            r#"<tool_call>{"name":"b","arguments":"{\"y\":2}"}</tool_call>"#,
            " done."
        ));

        let names = parsed.calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(parsed.calls[0].id, "k1");
        assert_eq!(parsed.calls[0].arguments, r#"{"x":1}"#);
        assert_eq!(parsed.calls[1].id, "call_2_1");
        assert_eq!(parsed.calls[1].arguments, r#"{"y":2}"#);
        assert_eq!(parsed.remainder, "First  then  done.");
    }

    #[test]
    fn attribute_form_keeps_raw_body_as_arguments() {
        let parsed = parse_text(r#"<tool_call name="echo" id='c9'> {"text":"hi"} </tool_call>"#);

        assert_eq!(parsed.calls.len(), 1);
        assert_eq!(parsed.calls[0].id, "c9");
        assert_eq!(parsed.calls[0].name, "echo");
        assert_eq!(parsed.calls[0].arguments, r#"{"text":"hi"}"#);
        assert!(parsed.remainder.is_empty());
    }

    #[test]
    fn malformed_payload_still_yields_a_named_call() {
        let parsed = parse_text(
            r#"<tool_call>{"name": "divide", "arguments": {a: 4}}</tool_call><tool_call>{"name":"echo"}</tool_call>"#,
        );

        assert_eq!(parsed.calls.len(), 2);
        assert_eq!(parsed.calls[0].name, "divide");
        assert_eq!(parsed.calls[0].arguments, r#"{"name": "divide", "arguments": {a: 4}}"#);
        assert_eq!(parsed.calls[1].name, "echo");
        assert_eq!(parsed.calls[1].arguments, "");
    }

    #[test]
    fn nameless_directive_becomes_call_with_empty_name() {
        let parsed = parse_text("<tool_call>gibberish</tool_call>");
        assert_eq!(parsed.calls.len(), 1);
        assert_eq!(parsed.calls[0].name, "");
        assert_eq!(parsed.calls[0].id, "call_2_0");
    }

    #[test]
    fn unterminated_or_lookalike_tags_are_plain_text() {
        let unterminated = parse_text(r#"Hmm <tool_call>{"name":"echo"}"#);
        assert!(unterminated.is_terminal());
        assert_eq!(unterminated.remainder, r#"Hmm <tool_call>{"name":"echo"}"#);

        let lookalike = parse_text("<tool_calls>not a directive</tool_calls>");
        assert!(lookalike.is_terminal());
    }

    #[test]
    fn structured_channel_fills_missing_and_duplicate_ids() {
        let parsed = StructuredChannelFormat.parse(
            RoundOutput::text(1, " thinking ").with_calls(vec![
                ToolCall::new("", "echo", "{}"),
                ToolCall::new("dup", "echo", "{}"),
                ToolCall::new("dup", "echo", "{}"),
            ]),
        );

        let ids = parsed.calls.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["call_1_0", "dup", "call_1_2"]);
        assert_eq!(parsed.remainder, "thinking");
    }

    #[test]
    fn generated_ids_never_collide_with_supplied_ones() {
        let parsed = StructuredChannelFormat.parse(RoundOutput::text(0, "").with_calls(vec![
            ToolCall::new("call_0_1", "echo", "{}"),
            ToolCall::new("", "echo", "{}"),
        ]));
        let ids = parsed.calls.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["call_0_1", "call_0_1_1"]);

        let parsed = StructuredChannelFormat.parse(RoundOutput::text(0, "").with_calls(vec![
            ToolCall::new("", "echo", "{}"),
            ToolCall::new("call_0_0", "echo", "{}"),
        ]));
        let ids = parsed.calls.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["call_0_0", "call_0_1"]);
    }

    #[test]
    fn parser_for_follows_call_framing() {
        let text = r#"<tool_call name="echo">{}</tool_call>"#;

        let embedded = parser_for(CallFraming::TextEmbedded).parse(RoundOutput::text(0, text));
        assert_eq!(embedded.calls.len(), 1);

        let structured =
            parser_for(CallFraming::StructuredChannel).parse(RoundOutput::text(0, text));
        assert!(structured.is_terminal());
        assert_eq!(structured.remainder, text);
    }
}
