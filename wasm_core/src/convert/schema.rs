// Top-level JSON Schema inference for the schema panel.
use serde_json::{json, Map, Value};

use crate::convert::json_utils::{encode_json, json_type_name, parse_object};
use crate::error::Result;

/// Builds an object schema whose `properties` map every top-level key of `map`
/// to its JSON type name. Nested values are not inspected.
pub fn object_schema(map: &Map<String, Value>) -> Value {
    let props: Map<String, Value> = map
        .iter()
        .map(|(key, value)| (key.clone(), json!({ "type": json_type_name(value) })))
        .collect();
    json!({
        "type": "object",
        "properties": props,
    })
}

/// Parses `input` as a JSON object and pretty-prints its inferred schema.
pub fn generate_schema(input: &str, indent: usize) -> Result<String> {
    let map = parse_object(input)?;
    encode_json(&object_schema(&map), Some(indent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::json_utils::parse_json;
    use pretty_assertions::assert_eq;

    #[test]
    fn properties_record_type_names() {
        let schema = parse_json(&generate_schema(r#"{"x":1,"y":"s"}"#, 4).unwrap()).unwrap();
        assert_eq!(schema["type"], "object");
        assert_eq!(
            schema["properties"],
            json!({"x":{"type":"number"},"y":{"type":"string"}})
        );
    }

    #[test]
    fn nested_values_only_report_their_outer_type() {
        let map = parse_object(r#"{"o":{"deep":1},"l":[1],"n":null,"b":false}"#).unwrap();
        let schema = object_schema(&map);
        assert_eq!(
            schema["properties"],
            json!({
                "o": {"type": "object"},
                "l": {"type": "array"},
                "n": {"type": "null"},
                "b": {"type": "boolean"}
            })
        );
    }

    #[test]
    fn empty_object_has_empty_properties() {
        let schema = object_schema(&Map::new());
        assert_eq!(schema, json!({"type":"object","properties":{}}));
    }

    #[test]
    fn non_object_input_is_rejected() {
        assert!(generate_schema("[1,2]", 4).unwrap_err().is_validation());
        assert!(generate_schema("{\"a\":", 4).unwrap_err().is_validation());
    }
}
