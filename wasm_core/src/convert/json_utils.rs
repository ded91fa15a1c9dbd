// JSON parse/encode helpers shared by the formatter, merge, schema and converter panels.
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::error::{Result, ToolError};

/// Parses a JSON string into `serde_json::Value`, keeping the parser's message on failure.
///
/// # Example
/// ```
/// use jsonkit_core::convert::json_utils::parse_json;
/// let value = parse_json("{\"id\":1}")?;
/// assert_eq!(value["id"], 1);
/// # Ok::<(), jsonkit_core::error::ToolError>(())
/// ```
pub fn parse_json(input: &str) -> Result<Value> {
    Ok(serde_json::from_str(input)?)
}

/// Parses JSON that must be an object (the merge and schema panels work on key-value mappings).
pub fn parse_object(input: &str) -> Result<Map<String, Value>> {
    match parse_json(input)? {
        Value::Object(map) => Ok(map),
        other => Err(ToolError::validation(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Encodes a JSON `Value` either minified (`indent == None`) or pretty-printed with
/// `indent` spaces per level.
///
/// # Example
/// ```
/// use serde_json::json;
/// use jsonkit_core::convert::json_utils::encode_json;
/// assert_eq!(encode_json(&json!({"a":1}), None)?, "{\"a\":1}");
/// assert_eq!(encode_json(&json!({"a":1}), Some(4))?, "{\n    \"a\": 1\n}");
/// # Ok::<(), jsonkit_core::error::ToolError>(())
/// ```
pub fn encode_json(value: &Value, indent: Option<usize>) -> Result<String> {
    let Some(width) = indent else {
        return Ok(serde_json::to_string(value)?);
    };
    let pad = vec![b' '; width];
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&pad));
    value
        .serialize(&mut ser)
        .map_err(|err| ToolError::operational(err.to_string()))?;
    String::from_utf8(buf).map_err(|err| ToolError::operational(err.to_string()))
}

/// Re-serializes `input` with `indent` spaces per level.
pub fn beautify(input: &str, indent: usize) -> Result<String> {
    encode_json(&parse_json(input)?, Some(indent))
}

/// Re-serializes `input` without insignificant whitespace.
pub fn minify(input: &str) -> Result<String> {
    encode_json(&parse_json(input)?, None)
}

/// Succeeds iff `input` is syntactically valid JSON.
pub fn validate(input: &str) -> Result<()> {
    parse_json(input).map(|_| ())
}

/// Name of the JSON type of `value`, as used in JSON Schema `type` keywords.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders a scalar for places that need plain text (CSV cells, XML text nodes).
/// Nested values fall back to compact JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
