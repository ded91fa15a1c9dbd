// JSON → XML rendering for the converter panel, in the "compact" layout: object keys
// become element tags, array items repeat their parent's tag.
use std::borrow::Cow;

use quick_xml::escape::escape;
use serde_json::Value;

/// Tag used when the top-level value is not an object and so has no key to name it.
pub const ROOT_TAG: &str = "root";

/// Renders `value` as indented XML without a declaration.
///
/// Top-level object keys become sibling elements, tags come from [`element_name`].
/// Arrays emit one element per item (nested arrays are flattened into the same
/// tag), `null` and empty objects render self-closing, and text is escaped.
///
/// # Example
/// ```
/// use serde_json::json;
/// use jsonkit_core::convert::xml::json_to_xml;
/// let xml = json_to_xml(&json!({"a":{"b":1}}), 4);
/// assert_eq!(xml, "<a>\n    <b>1</b>\n</a>");
/// ```
pub fn json_to_xml(value: &Value, indent: usize) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                build_xml(&mut out, &element_name(key), child, 0, indent);
            }
        }
        other => build_xml(&mut out, ROOT_TAG, other, 0, indent),
    }
    out.trim_end().to_string()
}

/// Turns an object key into a well-formed element name. Characters other than
/// letters, digits, `_`, `-` and `.` become `_`; a leading `_` is added when
/// the key is empty or does not start with a letter or `_`.
pub fn element_name(key: &str) -> Cow<'_, str> {
    let valid_start = key.chars().next().is_some_and(is_name_start);
    if valid_start && key.chars().all(is_name_char) {
        return Cow::Borrowed(key);
    }
    let mut name = String::with_capacity(key.len() + 1);
    if !valid_start {
        name.push('_');
    }
    name.extend(key.chars().map(|c| if is_name_char(c) { c } else { '_' }));
    Cow::Owned(name)
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic() || (!c.is_ascii() && c.is_alphabetic())
}

fn is_name_char(c: char) -> bool {
    matches!(c, '_' | '-' | '.') || c.is_ascii_alphanumeric() || (!c.is_ascii() && c.is_alphanumeric())
}

fn build_xml(buf: &mut String, name: &str, value: &Value, depth: usize, indent: usize) {
    let pad = " ".repeat(depth * indent);
    match value {
        Value::Object(map) if map.is_empty() => {
            buf.push_str(&format!("{pad}<{name}/>\n"));
        }
        Value::Object(map) => {
            buf.push_str(&format!("{pad}<{name}>\n"));
            for (key, child) in map {
                build_xml(buf, &element_name(key), child, depth + 1, indent);
            }
            buf.push_str(&format!("{pad}</{name}>\n"));
        }
        Value::Array(items) => {
            for item in items {
                build_xml(buf, name, item, depth, indent);
            }
        }
        Value::Null => {
            buf.push_str(&format!("{pad}<{name}/>\n"));
        }
        Value::String(s) => {
            buf.push_str(&format!("{pad}<{name}>{}</{name}>\n", escape(s.as_str())));
        }
        Value::Bool(_) | Value::Number(_) => {
            buf.push_str(&format!("{pad}<{name}>{value}</{name}>\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use serde_json::json;

    #[test]
    fn object_keys_become_tags() {
        let xml = json_to_xml(&json!({"name":"Ada","meta":{"age":36,"admin":true}}), 4);
        assert_eq!(
            xml,
            "<name>Ada</name>\n<meta>\n    <age>36</age>\n    <admin>true</admin>\n</meta>"
        );
    }

    #[test]
    fn arrays_repeat_the_parent_tag() {
        let xml = json_to_xml(&json!({"item":[1,{"id":2},[3]]}), 2);
        assert_eq!(
            xml,
            "<item>1</item>\n<item>\n  <id>2</id>\n</item>\n<item>3</item>"
        );
    }

    #[test]
    fn null_and_empty_objects_self_close() {
        let xml = json_to_xml(&json!({"a":null,"b":{}}), 4);
        assert_eq!(xml, "<a/>\n<b/>");
    }

    #[test]
    fn text_is_escaped() {
        let xml = json_to_xml(&json!({"q":"a<b & c>d"}), 4);
        assert_eq!(xml, "<q>a&lt;b &amp; c&gt;d</q>");
    }

    #[test]
    fn keys_are_mapped_to_valid_names() {
        assert_eq!(element_name("name"), "name");
        assert_eq!(element_name("first name"), "first_name");
        assert_eq!(element_name("a<b"), "a_b");
        assert_eq!(element_name(""), "_");
        assert_eq!(element_name("1st"), "_1st");
        assert_eq!(element_name("-x"), "_-x");
        assert_eq!(element_name("ns:tag"), "ns_tag");
        assert_eq!(element_name("größe"), "größe");
    }

    #[test]
    fn awkward_keys_still_produce_well_formed_xml() {
        let value = json!({
            "first name": "Ada",
            "a<b": 1,
            "": 2,
            "1st": {"x y": [true, null], "&": "<&>"},
        });
        let xml = json_to_xml(&value, 4);
        assert_eq!(
            xml,
            "<first_name>Ada</first_name>\n<a_b>1</a_b>\n<_>2</_>\n<_1st>\n    <x_y>true</x_y>\n    <x_y/>\n    <_>&lt;&amp;&gt;</_>\n</_1st>"
        );

        let doc = format!("<doc>{xml}</doc>");
        let mut reader = Reader::from_str(&doc);
        let mut depth = 0usize;
        loop {
            match reader.read_event() {
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => depth -= 1,
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => panic!("not well-formed: {err}\n{doc}"),
            }
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn top_level_scalars_and_arrays_use_root_tag() {
        assert_eq!(json_to_xml(&json!(5), 4), "<root>5</root>");
        assert_eq!(json_to_xml(&json!(["x","y"]), 4), "<root>x</root>\n<root>y</root>");
        assert_eq!(json_to_xml(&json!([]), 4), "");
    }
}
