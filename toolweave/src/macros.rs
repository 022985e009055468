/// Builds a [`ParameterSchema`](crate::ParameterSchema) from `name: type` pairs.
///
/// A `?` after the name marks the parameter optional. Types use the JSON
/// vocabulary: `string`, `integer`, `number`, `boolean`, `array`, `object`,
/// `null`.
///
/// ```rust
/// use toolweave::{ParamType, tw_schema};
///
/// let schema = tw_schema![path: string, contents: string, overwrite?: boolean];
/// assert_eq!(schema.required_names(), vec!["path", "contents"]);
/// assert_eq!(
///     schema.get("overwrite").map(|spec| spec.param_type),
///     Some(ParamType::Boolean)
/// );
/// ```
#[macro_export]
macro_rules! tw_schema {
    (@specs [$($specs:expr,)*]) => {
        $crate::ParameterSchema::new(vec![$($specs),*])
    };
    (@specs [$($specs:expr,)*] $name:ident ?: $kind:ident $(, $($rest:tt)*)?) => {
        $crate::tw_schema!(
            @specs [$($specs,)* $crate::ParameterSpec::optional(
                stringify!($name),
                $crate::tw_param_type!($kind),
            ),]
            $($($rest)*)?
        )
    };
    (@specs [$($specs:expr,)*] $name:ident : $kind:ident $(, $($rest:tt)*)?) => {
        $crate::tw_schema!(
            @specs [$($specs,)* $crate::ParameterSpec::required(
                stringify!($name),
                $crate::tw_param_type!($kind),
            ),]
            $($($rest)*)?
        )
    };
    (@specs [$($specs:expr,)*] $($unexpected:tt)+) => {
        compile_error!("expected `name: type` or `name?: type`")
    };
    ($($body:tt)*) => {
        $crate::tw_schema!(@specs [] $($body)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! tw_param_type {
    (string) => {
        $crate::ParamType::String
    };
    (integer) => {
        $crate::ParamType::Integer
    };
    (number) => {
        $crate::ParamType::Number
    };
    (boolean) => {
        $crate::ParamType::Boolean
    };
    (array) => {
        $crate::ParamType::Array
    };
    (object) => {
        $crate::ParamType::Object
    };
    (null) => {
        $crate::ParamType::Null
    };
    ($other:ident) => {
        compile_error!(concat!(
            "unsupported parameter type `",
            stringify!($other),
            "`: use string, integer, number, boolean, array, object, or null"
        ))
    };
}

/// Creates a [`ConversationTurn`](crate::ConversationTurn) from a role shorthand.
///
/// ```rust
/// use toolweave::{Role, ToolCall, ToolResult, tw_turn};
///
/// let question = tw_turn!(user => "What is 4 / 2?");
/// let call = tw_turn!(assistant => "", vec![ToolCall::new("c1", "divide", r#"{"a":4,"b":2}"#)]);
/// let result = tw_turn!(tool => vec![ToolResult::success("c1", "2")]);
///
/// assert_eq!(question.role(), Role::User);
/// assert!(call.has_calls());
/// assert_eq!(result.results()[0].value(), Some("2"));
/// ```
#[macro_export]
macro_rules! tw_turn {
    (user => $content:expr $(,)?) => {
        $crate::ConversationTurn::user($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::ConversationTurn::assistant($content, Vec::new())
    };
    (assistant => $content:expr, $calls:expr $(,)?) => {
        $crate::ConversationTurn::assistant($content, $calls)
    };
    (tool => $results:expr $(,)?) => {
        $crate::ConversationTurn::tool($results)
    };
    ($role:ident => $($rest:tt)*) => {
        compile_error!("unsupported role: use user, assistant, or tool");
    };
}
