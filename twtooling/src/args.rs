//! Argument validation against declared parameter schemas.
//!
//! ```rust
//! use twprovider::{ParamType, ParameterSchema, ParameterSpec};
//! use twtooling::{ExtraArguments, validate_arguments};
//!
//! let schema = ParameterSchema::new(vec![ParameterSpec::required("query", ParamType::String)]);
//! let args = validate_arguments(&schema, r#"{"query":"rust"}"#, ExtraArguments::Reject)
//!     .expect("arguments should validate");
//! assert_eq!(args.string("query").expect("query should be present"), "rust");
//! ```

use serde_json::{Map, Value};
use twprovider::{ParamType, ParameterSchema};

use crate::ToolError;

/// What to do with arguments the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraArguments {
    #[default]
    Reject,
    Ignore,
}

/// Arguments that passed schema validation.
///
/// Every declared required parameter is present with a compatible type;
/// absent optional parameters are simply missing from the map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolArguments {
    values: Map<String, Value>,
}

impl ToolArguments {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn string(&self, key: &str) -> Result<&str, ToolError> {
        self.optional_string(key)?
            .ok_or_else(|| missing(key, ParamType::String))
    }

    pub fn optional_string(&self, key: &str) -> Result<Option<&str>, ToolError> {
        self.typed(key, ParamType::String, Value::as_str)
    }

    pub fn number(&self, key: &str) -> Result<f64, ToolError> {
        self.optional_number(key)?
            .ok_or_else(|| missing(key, ParamType::Number))
    }

    pub fn optional_number(&self, key: &str) -> Result<Option<f64>, ToolError> {
        self.typed(key, ParamType::Number, Value::as_f64)
    }

    pub fn integer(&self, key: &str) -> Result<i64, ToolError> {
        self.optional_integer(key)?
            .ok_or_else(|| missing(key, ParamType::Integer))
    }

    pub fn optional_integer(&self, key: &str) -> Result<Option<i64>, ToolError> {
        self.typed(key, ParamType::Integer, Value::as_i64)
    }

    pub fn boolean(&self, key: &str) -> Result<bool, ToolError> {
        self.optional_boolean(key)?
            .ok_or_else(|| missing(key, ParamType::Boolean))
    }

    pub fn optional_boolean(&self, key: &str) -> Result<Option<bool>, ToolError> {
        self.typed(key, ParamType::Boolean, Value::as_bool)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: ParamType,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, ToolError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => extract(value).map(Some).ok_or_else(|| {
                ToolError::invalid_arguments(format!(
                    "parameter '{key}' expects {expected}, got {}",
                    ParamType::of(value)
                ))
            }),
        }
    }
}

fn missing(key: &str, expected: ParamType) -> ToolError {
    ToolError::invalid_arguments(format!("missing required {expected}: '{key}'"))
}

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

/// Parses a raw payload into a JSON object. A blank payload is an empty object.
pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    if args_json.trim().is_empty() {
        return Ok(Map::new());
    }

    match parse_json_value(args_json)? {
        Value::Object(map) => Ok(map),
        other => Err(ToolError::invalid_arguments(format!(
            "expected JSON object arguments, got {}",
            ParamType::of(&other)
        ))),
    }
}

/// Validates a raw argument payload against `schema`.
///
/// Declared parameters are checked in declaration order, then undeclared
/// ones in payload order; the first violation is reported. A `null` value
/// for an optional parameter counts as absent; a required one must accept it.
pub fn validate_arguments(
    schema: &ParameterSchema,
    args_json: &str,
    extra: ExtraArguments,
) -> Result<ToolArguments, ToolError> {
    let mut values = parse_json_object(args_json)?;

    for spec in schema.iter() {
        let present = values
            .get(&spec.name)
            .filter(|value| spec.required || !value.is_null());
        match present {
            None if spec.required => {
                return Err(ToolError::invalid_arguments(format!(
                    "missing required parameter '{}'",
                    spec.name
                )));
            }
            None => {
                values.shift_remove(&spec.name);
            }
            Some(value)
                if spec.param_type == ParamType::Integer && value.is_u64() && !value.is_i64() =>
            {
                return Err(ToolError::invalid_arguments(format!(
                    "parameter '{}' is out of range for integer",
                    spec.name
                )));
            }
            Some(value) if !spec.param_type.accepts(value) => {
                return Err(ToolError::invalid_arguments(format!(
                    "parameter '{}' expects {}, got {}",
                    spec.name,
                    spec.param_type,
                    ParamType::of(value)
                )));
            }
            Some(_) => {}
        }
    }

    let undeclared = values
        .keys()
        .filter(|key| schema.get(key).is_none())
        .cloned()
        .collect::<Vec<_>>();

    if let Some(first) = undeclared.first() {
        match extra {
            ExtraArguments::Reject => {
                return Err(ToolError::invalid_arguments(format!(
                    "unexpected parameter '{first}'"
                )));
            }
            ExtraArguments::Ignore => {
                for key in &undeclared {
                    values.shift_remove(key);
                }
            }
        }
    }

    Ok(ToolArguments::new(values))
}

#[cfg(test)]
mod tests {
    use twprovider::{ParamType, ParameterSpec};

    use super::*;
    use crate::ToolErrorKind;

    fn divide_schema() -> ParameterSchema {
        ParameterSchema::new(vec![
            ParameterSpec::required("a", ParamType::Number),
            ParameterSpec::required("b", ParamType::Number),
            ParameterSpec::optional("label", ParamType::String),
        ])
    }

    #[test]
    fn parse_invalid_json_returns_invalid_arguments() {
        let error = parse_json_value("{").expect_err("json should fail");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    }

    #[test]
    fn blank_payload_is_an_empty_object() {
        let args = parse_json_object("  ").expect("blank payload should parse");
        assert!(args.is_empty());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let error = parse_json_object("[1,2]").expect_err("array should fail");
        assert_eq!(error.message, "expected JSON object arguments, got array");
    }

    #[test]
    fn valid_arguments_expose_typed_accessors() {
        let args = validate_arguments(
            &divide_schema(),
            r#"{"a":4,"b":2.5,"label":"ratio"}"#,
            ExtraArguments::Reject,
        )
        .expect("arguments should validate");

        assert_eq!(args.number("a").expect("a"), 4.0);
        assert_eq!(args.number("b").expect("b"), 2.5);
        assert_eq!(args.optional_string("label").expect("label"), Some("ratio"));
        assert!(args.string("a").is_err());
    }

    #[test]
    fn first_missing_required_parameter_is_reported() {
        let error = validate_arguments(&divide_schema(), r#"{"label":"x"}"#, ExtraArguments::Reject)
            .expect_err("missing params should fail");
        assert_eq!(error.message, "missing required parameter 'a'");
    }

    #[test]
    fn type_mismatch_names_expected_and_actual_types() {
        let error = validate_arguments(&divide_schema(), r#"{"a":"4","b":1}"#, ExtraArguments::Reject)
            .expect_err("string for number should fail");
        assert_eq!(error.message, "parameter 'a' expects number, got string");
    }

    #[test]
    fn null_optional_parameter_counts_as_absent() {
        let args = validate_arguments(
            &divide_schema(),
            r#"{"a":1,"b":2,"label":null}"#,
            ExtraArguments::Reject,
        )
        .expect("null optional should validate");
        assert!(!args.contains("label"));
        assert_eq!(args.optional_string("label").expect("label"), None);
    }

    #[test]
    fn required_null_parameter_accepts_null() {
        let schema = ParameterSchema::new(vec![ParameterSpec::required("nothing", ParamType::Null)]);

        let args = validate_arguments(&schema, r#"{"nothing":null}"#, ExtraArguments::Reject)
            .expect("null should satisfy a required null parameter");
        assert!(args.contains("nothing"));

        let error = validate_arguments(&schema, "{}", ExtraArguments::Reject)
            .expect_err("absent required null should fail");
        assert_eq!(error.message, "missing required parameter 'nothing'");
    }

    #[test]
    fn required_parameter_given_null_reports_type_mismatch() {
        let error = validate_arguments(&divide_schema(), r#"{"a":null,"b":2}"#, ExtraArguments::Reject)
            .expect_err("null for number should fail");
        assert_eq!(error.message, "parameter 'a' expects number, got null");
    }

    #[test]
    fn integer_beyond_i64_is_rejected_before_the_tool_runs() {
        let schema = ParameterSchema::new(vec![ParameterSpec::required("n", ParamType::Integer)]);

        let error = validate_arguments(
            &schema,
            r#"{"n":18446744073709551615}"#,
            ExtraArguments::Reject,
        )
        .expect_err("u64 beyond i64 should fail");
        assert_eq!(error.message, "parameter 'n' is out of range for integer");

        let args = validate_arguments(&schema, r#"{"n":-9223372036854775808}"#, ExtraArguments::Reject)
            .expect("i64::MIN should validate");
        assert_eq!(args.integer("n").expect("n"), i64::MIN);
    }

    #[test]
    fn extra_parameters_follow_configured_policy() {
        let payload = r#"{"a":1,"b":2,"unit":"cm"}"#;

        let error = validate_arguments(&divide_schema(), payload, ExtraArguments::Reject)
            .expect_err("extra parameter should be rejected");
        assert_eq!(error.message, "unexpected parameter 'unit'");

        let args = validate_arguments(&divide_schema(), payload, ExtraArguments::Ignore)
            .expect("extra parameter should be ignored");
        assert!(!args.contains("unit"));
        assert_eq!(args.as_map().len(), 2);
    }
}
