use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur while writing a JSON document.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize the document.
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to create, write or rename the output file.
    #[error("failed to write JSON file: {0}")]
    Io(#[from] std::io::Error),
    /// Temporary file could not be moved over the final path.
    #[error("failed to move JSON file into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

const INDENT: &[u8] = b"    ";

/// Serialize `value` as pretty JSON bytes.
///
/// Object keys are sorted, indentation is four spaces and the output ends
/// with a newline, so equal values always produce identical bytes.
pub fn to_json_bytes(value: &Value) -> Result<Vec<u8>, WriteError> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    sorted(value).serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

/// Copy of `value` with every object's keys in sorted order.
///
/// `serde_json::Map` is only sorted while the `preserve_order` feature is off
/// in the whole build, so ordering is enforced here rather than assumed.
pub fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (key, child) in entries {
                out.insert(key.clone(), sorted(child));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// Write `value` to `writer` followed by a newline.
pub fn write_json<W: Write>(writer: &mut W, value: &Value) -> Result<(), WriteError> {
    writer.write_all(&to_json_bytes(value)?)?;
    writer.flush()?;
    Ok(())
}

/// Write `value` to `path`, replacing any existing file.
///
/// The parent directory is created when missing. Content goes into a
/// temporary file in the same directory which is then renamed over `path`,
/// so readers never observe a partially written document.
pub fn write_json_file(value: &Value, path: &Path) -> Result<(), WriteError> {
    let bytes = to_json_bytes(value)?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
