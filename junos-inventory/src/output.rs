use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use conf_tree_core::{write_json, write_json_file, WriteError};
use tracing::{debug, info, warn};

use crate::context::{OutputMode, RunContext};
use crate::error::DeviceError;
use crate::record::Record;

/// Where one record ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub device: String,
    /// Written file, `None` in stdout mode.
    pub path: Option<PathBuf>,
}

/// Output file for `name` inside `dir`.
pub fn record_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Keep one record per canonical name, ordered by name.
///
/// Both routing engines of one chassis normalize to the same name; the
/// later record replaces the earlier one.
pub fn collapse(records: Vec<Record>) -> Vec<Record> {
    let mut by_name: BTreeMap<String, Record> = BTreeMap::new();
    for record in records {
        if let Some(previous) = by_name.insert(record.name().to_string(), record) {
            warn!(
                device = previous.name(),
                "duplicate canonical name in batch, keeping the later record"
            );
        }
    }
    by_name.into_values().collect()
}

/// Emit every record according to `ctx.output`.
///
/// Records are independent: a failure for one is returned in its slot and
/// the remaining records are still attempted.
pub fn emit<W: Write>(
    records: &[Record],
    ctx: &RunContext,
    stdout: &mut W,
) -> Vec<Result<Emitted, DeviceError>> {
    records
        .iter()
        .map(|record| emit_one(record, ctx, stdout))
        .collect()
}

fn emit_one<W: Write>(
    record: &Record,
    ctx: &RunContext,
    stdout: &mut W,
) -> Result<Emitted, DeviceError> {
    let device = record.name().to_string();
    let write_err = |source: WriteError| DeviceError::Write {
        device: device.clone(),
        source,
    };

    let path = match &ctx.output {
        OutputMode::Stdout => {
            write_json(stdout, &record.to_envelope()).map_err(write_err)?;
            None
        }
        OutputMode::Directory(dir) => {
            ensure_file_stem(&device).map_err(write_err)?;
            let path = record_path(dir, &device);
            write_json_file(&record.to_envelope(), &path).map_err(write_err)?;
            if ctx.verbose {
                info!(device = %device, path = %path.display(), "record written");
            } else {
                debug!(device = %device, path = %path.display(), "record written");
            }
            Some(path)
        }
    };

    Ok(Emitted { device, path })
}

/// A device name must stay a single path component.
fn ensure_file_stem(name: &str) -> Result<(), WriteError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(WriteError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("device name '{name}' is not usable as a file name"),
        )));
    }
    Ok(())
}
