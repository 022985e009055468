//! Declared parameter schemas and the model-facing tool declaration.
//!
//! Schemas are built explicitly by the caller; nothing is inferred from the
//! tool implementation itself.
//!
//! ```rust
//! use twprovider::{ParamType, ToolDefinition};
//!
//! let definition = ToolDefinition::builder("divide")
//!     .description("Divides a by b")
//!     .required("a", ParamType::Number)
//!     .required("b", ParamType::Number)
//!     .build()
//!     .expect("definition should be valid");
//!
//! assert_eq!(definition.parameters.required_names(), vec!["a", "b"]);
//! assert_eq!(definition.to_json_schema()["function"]["name"], "divide");
//! ```

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde_json::{Map, Value, json};

use crate::ProviderError;

/// JSON value categories a parameter may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }

    /// Returns whether `value` is compatible with this declared type.
    ///
    /// `Integer` only accepts integral numbers that fit in an `i64`; `Number`
    /// accepts any number.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Null => value.is_null(),
        }
    }

    /// Classifies an arbitrary JSON value using the same vocabulary.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(number) if number.is_f64() => Self::Number,
            Value::Number(_) => Self::Integer,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub param_type: ParamType,
    pub required: bool,
    pub description: Option<String>,
}

impl ParameterSpec {
    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            description: None,
        }
    }

    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered parameter declarations for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterSchema {
    params: Vec<ParameterSpec>,
}

impl ParameterSchema {
    pub fn new(params: Vec<ParameterSpec>) -> Self {
        Self { params }
    }

    pub fn with(mut self, spec: ParameterSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.iter()
    }

    pub fn required_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        let mut seen = HashSet::new();
        for spec in &self.params {
            if spec.name.trim().is_empty() {
                return Err(ProviderError::invalid_request(
                    "parameter names must not be empty",
                ));
            }

            if !seen.insert(spec.name.as_str()) {
                return Err(ProviderError::invalid_request(format!(
                    "parameter '{}' is declared more than once",
                    spec.name
                )));
            }
        }

        Ok(())
    }

    /// Renders a strict JSON-Schema object for wire-level tool declarations.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for spec in &self.params {
            let mut property = Map::new();
            property.insert("type".to_string(), json!(spec.param_type.as_str()));
            if let Some(description) = &spec.description {
                property.insert("description".to_string(), json!(description));
            }
            properties.insert(spec.name.clone(), Value::Object(property));
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_names(),
            "additionalProperties": false,
        })
    }
}

impl FromIterator<ParameterSpec> for ParameterSchema {
    fn from_iter<I: IntoIterator<Item = ParameterSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Tool declaration sent to model producers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    pub fn builder(name: impl Into<String>) -> ToolDefinitionBuilder {
        ToolDefinitionBuilder::new(name)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.name.trim().is_empty() {
            return Err(ProviderError::invalid_request("tool name must not be empty"));
        }

        self.parameters.validate()
    }

    pub fn to_json_schema(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters.to_json_schema(),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinitionBuilder {
    name: String,
    description: String,
    params: Vec<ParameterSpec>,
}

impl ToolDefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            params: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(self, name: impl Into<String>, param_type: ParamType) -> Self {
        self.param(ParameterSpec::required(name, param_type))
    }

    pub fn optional(self, name: impl Into<String>, param_type: ParamType) -> Self {
        self.param(ParameterSpec::optional(name, param_type))
    }

    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn parameters(mut self, schema: ParameterSchema) -> Self {
        self.params.extend(schema.params);
        self
    }

    pub fn build(self) -> Result<ToolDefinition, ProviderError> {
        let definition = ToolDefinition {
            name: self.name,
            description: self.description,
            parameters: ParameterSchema::new(self.params),
        };

        definition.validate()?;
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn integer_type_rejects_fractional_numbers() {
        assert!(ParamType::Integer.accepts(&json!(3)));
        assert!(!ParamType::Integer.accepts(&json!(3.5)));
        assert!(!ParamType::Integer.accepts(&json!(u64::MAX)));
        assert!(ParamType::Number.accepts(&json!(3.5)));
        assert!(ParamType::Number.accepts(&json!(3)));
        assert!(!ParamType::String.accepts(&json!(3)));
    }

    #[test]
    fn param_type_classifies_values() {
        assert_eq!(ParamType::of(&json!("x")), ParamType::String);
        assert_eq!(ParamType::of(&json!(1)), ParamType::Integer);
        assert_eq!(ParamType::of(&json!(1.25)), ParamType::Number);
        assert_eq!(ParamType::of(&json!([1])), ParamType::Array);
        assert_eq!(ParamType::of(&json!(null)), ParamType::Null);
    }

    #[test]
    fn builder_rejects_duplicate_parameter_names() {
        let error = ToolDefinition::builder("echo")
            .required("text", ParamType::String)
            .optional("text", ParamType::Integer)
            .build()
            .expect_err("duplicate parameter should fail");

        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
        assert!(error.message.contains("'text'"));
    }

    #[test]
    fn builder_rejects_blank_tool_name() {
        let error = ToolDefinition::builder("  ")
            .build()
            .expect_err("blank name should fail");
        assert_eq!(error.message, "tool name must not be empty");
    }

    #[test]
    fn json_schema_preserves_declaration_order_and_required_list() {
        let definition = ToolDefinition::builder("search")
            .description("Searches the index")
            .param(
                ParameterSpec::required("query", ParamType::String)
                    .with_description("Search terms"),
            )
            .optional("limit", ParamType::Integer)
            .build()
            .expect("definition should build");

        let schema = definition.parameters.to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["query"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["query"]["description"], "Search terms");
        assert_eq!(schema["properties"]["limit"]["type"], "integer");

        let names = definition
            .parameters
            .iter()
            .map(|spec| spec.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["query", "limit"]);
    }
}
