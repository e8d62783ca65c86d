use serde_json::{Map, Value};

use crate::tree::XmlNode;

/// Key under which element attributes are kept in the converted object.
pub const ATTRIBUTES_KEY: &str = "@";

/// Convert an element tree into the JSON shape understood by [`crate::query`].
///
/// - an element without children or attributes becomes its text, or `null`
///   when it has none (JunOS flag elements like `<vlan-tagging/>`)
/// - an element with children becomes an object keyed by child tag
/// - repeated child tags become an array in document order
/// - attributes are kept under the `@` key
/// - mixed text next to children is kept under `#text`
pub fn to_value(node: &XmlNode) -> Value {
    if node.children.is_empty() && node.attributes.is_empty() {
        return node
            .text
            .as_ref()
            .map(|text| Value::String(text.clone()))
            .unwrap_or(Value::Null);
    }

    let mut map = Map::new();
    if !node.attributes.is_empty() {
        let attrs = node
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attrs));
    }
    if let Some(text) = &node.text {
        map.insert("#text".to_string(), Value::String(text.clone()));
    }

    for child in &node.children {
        let converted = to_value(child);
        match map.get_mut(&child.tag) {
            // `to_value` never yields an array itself, so an existing array
            // was built here from an earlier repeat.
            Some(Value::Array(items)) => items.push(converted),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, converted]);
            }
            None => {
                map.insert(child.tag.clone(), converted);
            }
        }
    }

    Value::Object(map)
}
