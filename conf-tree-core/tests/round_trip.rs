use std::fs;
use std::path::PathBuf;

use conf_tree_core::{parse_file, to_json_bytes, to_value, write_json_file};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn written_json_parses_back_to_the_same_value() {
    let node = parse_file(&fixture("fixtures/junos/core1-chassis.xml")).expect("parse");
    let chassis = node
        .get_path(&["chassis-inventory", "chassis"])
        .expect("chassis");
    let value = to_value(chassis);

    let dir = tempfile::tempdir().expect("tempdir should be created");
    let out_path = dir.path().join("chassis.json");
    write_json_file(&value, &out_path).expect("write should succeed");

    let reparsed: Value =
        serde_json::from_slice(&fs::read(&out_path).expect("read")).expect("json");
    assert_eq!(reparsed, value);
    assert_eq!(reparsed["description"], json!("MX480"));
    assert_eq!(reparsed["chassis-module"][1]["name"], json!("Routing Engine 0"));
}

#[test]
fn rewriting_the_same_value_is_byte_identical() {
    let value = json!({"host": {"name": "core1", "version": 1, "list": [3, 1, 2]}});
    let dir = tempfile::tempdir().expect("tempdir");
    let out_path = dir.path().join("nested").join("core1.json");

    write_json_file(&value, &out_path).expect("first write");
    let first = fs::read(&out_path).expect("read first");
    write_json_file(&value, &out_path).expect("second write");
    let second = fs::read(&out_path).expect("read second");

    assert_eq!(first, second);
    assert_eq!(first, to_json_bytes(&value).expect("bytes"));
}

#[test]
fn rewrite_replaces_previous_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_path = dir.path().join("core1.json");

    write_json_file(&json!({"a": [1, 2, 3, 4, 5, 6]}), &out_path).expect("first write");
    write_json_file(&json!({"a": []}), &out_path).expect("second write");

    let text = fs::read_to_string(&out_path).expect("read");
    assert_eq!(text, "{\n    \"a\": []\n}\n");
    let leftovers: Vec<_> = fs::read_dir(dir.path()).expect("list").collect();
    assert_eq!(leftovers.len(), 1);
}
