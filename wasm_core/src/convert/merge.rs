// Shallow merge of two JSON objects for the merge panel.
use serde_json::{Map, Value};

use crate::convert::json_utils::{encode_json, parse_object};
use crate::error::Result;

/// Merges `right` into `left`. Keys present in both take `right`'s value wholesale;
/// nested objects are replaced, not merged. Keys keep their first-seen position.
pub fn shallow_merge(mut left: Map<String, Value>, right: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in right {
        left.insert(key, value);
    }
    left
}

/// Parses both sides as JSON objects, merges them, and pretty-prints the result.
///
/// # Example
/// ```
/// use jsonkit_core::convert::merge::merge_json;
/// let merged = merge_json(r#"{"a":1}"#, r#"{"a":2,"b":3}"#, 4)?;
/// assert_eq!(merged, "{\n    \"a\": 2,\n    \"b\": 3\n}");
/// # Ok::<(), jsonkit_core::error::ToolError>(())
/// ```
pub fn merge_json(left: &str, right: &str, indent: usize) -> Result<String> {
    let left = parse_object(left)?;
    let right = parse_object(right)?;
    encode_json(&Value::Object(shallow_merge(left, right)), Some(indent))
}
