//! Dotted-path lookup over JSON-shaped trees.
//!
//! Every lookup returns `None` (or an empty `Vec`) for a missing path instead
//! of failing, so callers can walk optional substructure without guarding
//! each step.

use serde_json::Value;

/// Resolve a dot-separated key path against `tree`.
///
/// Traversal stops with `None` as soon as the current node is not an object or
/// does not contain the next key. An empty path returns `tree` itself.
pub fn find<'a>(path: &str, tree: &'a Value) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(tree);
    }
    path.split('.')
        .try_fold(tree, |node, key| node.as_object()?.get(key))
}

/// Resolve a path given as separate keys.
///
/// Unlike [`find`], keys may themselves contain dots (`ieee-802.3ad`).
pub fn find_path<'a>(path: &[&str], tree: &'a Value) -> Option<&'a Value> {
    path.iter()
        .try_fold(tree, |node, key| node.as_object()?.get(*key))
}

/// Like [`find`] but falls back to `default` when the path is missing.
pub fn find_or<'a>(path: &str, tree: &'a Value, default: &'a Value) -> &'a Value {
    find(path, tree).unwrap_or(default)
}

/// Resolve `path` and unwrap a singleton-as-list encoding.
///
/// A non-empty array yields its first element; any other value, including an
/// empty array, is returned unchanged.
pub fn find_first<'a>(path: &str, tree: &'a Value) -> Option<&'a Value> {
    find(path, tree).map(first_of)
}

fn first_of(found: &Value) -> &Value {
    match found {
        Value::Array(items) if !items.is_empty() => &items[0],
        other => other,
    }
}

/// Collect `items[i][key]` for every object item that contains `key`.
///
/// Items lacking the key are skipped. A non-array `items` yields an empty
/// result.
pub fn find_all<'a>(key: &str, items: &'a Value) -> Vec<&'a Value> {
    let Some(items) = items.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.as_object()?.get(key))
        .collect()
}

/// Iterate `path` as a sequence of nodes.
///
/// An array yields its elements, a single object yields itself (one-element
/// encoding) and anything else yields nothing.
pub fn find_list<'a>(path: &str, tree: &'a Value) -> Vec<&'a Value> {
    match find(path, tree) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(node @ Value::Object(_)) => vec![node],
        _ => Vec::new(),
    }
}

/// Scalar text of the node at `path`.
///
/// Strings are returned verbatim, numbers and booleans via their JSON text,
/// one-element arrays are unwrapped. Objects, `null` and missing paths give
/// `None`.
pub fn find_str(path: &str, tree: &Value) -> Option<String> {
    find_first(path, tree).and_then(scalar_text)
}

/// [`find_str`] for a path given as separate keys.
pub fn find_path_str(path: &[&str], tree: &Value) -> Option<String> {
    find_path(path, tree).map(first_of).and_then(scalar_text)
}

/// Text form of a scalar node.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// True when `tree` is an object containing `key`, whatever its value.
pub fn has_key(key: &str, tree: &Value) -> bool {
    tree.as_object().is_some_and(|map| map.contains_key(key))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        find, find_all, find_first, find_list, find_or, find_path, find_path_str, find_str, has_key,
    };

    #[test]
    fn find_walks_nested_objects() {
        let tree = json!({"a": {"b": {"c": 3}}});
        assert_eq!(find("a.b.c", &tree), Some(&json!(3)));
        assert_eq!(find("a.x.c", &tree), None);
    }

    #[test]
    fn find_stops_at_non_object_nodes() {
        let tree = json!({"a": [{"b": 1}], "s": "text"});
        assert_eq!(find("a.b", &tree), None);
        assert_eq!(find("s.len", &tree), None);
    }

    #[test]
    fn find_path_keeps_dotted_keys_whole() {
        let tree = json!({
            "gigether-options": {"ieee-802.3ad": {"bundle": ["ae1"]}}
        });
        let path = ["gigether-options", "ieee-802.3ad", "bundle"];
        assert_eq!(find_path(&path, &tree), Some(&json!(["ae1"])));
        assert_eq!(find_path_str(&path, &tree).as_deref(), Some("ae1"));
        assert_eq!(find("gigether-options.ieee-802.3ad.bundle", &tree), None);
        assert_eq!(find_path(&[], &tree), Some(&tree));
        assert_eq!(find_path_str(&["gigether-options", "missing"], &tree), None);
    }

    #[test]
    fn find_or_uses_default_for_missing_paths() {
        let tree = json!({});
        let empty = json!([]);
        assert_eq!(find_or("junos:bgp.group", &tree, &empty), &json!([]));
    }

    #[test]
    fn find_first_unwraps_singleton_lists() {
        let tree = json!({"one": ["x"], "none": [], "plain": "y"});
        assert_eq!(find_first("one", &tree), Some(&json!("x")));
        assert_eq!(find_first("none", &tree), Some(&json!([])));
        assert_eq!(find_first("plain", &tree), Some(&json!("y")));
        assert_eq!(find_first("missing", &tree), None);
    }

    #[test]
    fn find_all_skips_items_without_key() {
        let items = json!([{"name": "a"}, {"other": 1}, {"name": "b"}, "scalar"]);
        let names = find_all("name", &items);
        assert_eq!(names, vec![&json!("a"), &json!("b")]);
    }

    #[test]
    fn find_all_tolerates_non_sequences() {
        assert!(find_all("name", &json!({"name": "a"})).is_empty());
        assert!(find_all("name", &json!(null)).is_empty());
    }

    #[test]
    fn find_list_accepts_single_object_encoding() {
        let tree = json!({"group": {"name": "G1"}, "groups": [{"name": "A"}, {"name": "B"}]});
        assert_eq!(find_list("group", &tree).len(), 1);
        assert_eq!(find_list("groups", &tree).len(), 2);
        assert!(find_list("missing", &tree).is_empty());
    }

    #[test]
    fn find_str_renders_scalars_as_text() {
        let tree = json!({"as": 65000, "id": "10", "list": ["20"], "obj": {}});
        assert_eq!(find_str("as", &tree).as_deref(), Some("65000"));
        assert_eq!(find_str("id", &tree).as_deref(), Some("10"));
        assert_eq!(find_str("list", &tree).as_deref(), Some("20"));
        assert_eq!(find_str("obj", &tree), None);
    }

    #[test]
    fn has_key_ignores_value() {
        let tree = json!({"vlan-tagging": [null]});
        assert!(has_key("vlan-tagging", &tree));
        assert!(!has_key("flexible-vlan-tagging", &tree));
        assert!(!has_key("x", &json!([])));
    }
}
