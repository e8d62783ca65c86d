use conf_tree_core::WriteError;
use thiserror::Error;

use crate::source::SourceError;

/// Errors raised while turning one raw configuration tree into a record.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A field required for the record identity is absent.
    #[error("required field '{field}' not found in {encoding} configuration")]
    MissingField {
        field: &'static str,
        encoding: &'static str,
    },
    /// Raw bytes could not be interpreted as a configuration tree.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// No registered extractor recognises the tree.
    #[error("no extractor recognises this configuration")]
    UnsupportedVendor,
    /// The normalized equipment name came out empty.
    #[error("equipment name is empty after normalizing '{raw}'")]
    EmptyName { raw: String },
}

/// Failure for one device within a batch run.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Fetch(#[from] SourceError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("failed to write record for {device}: {source}")]
    Write {
        device: String,
        #[source]
        source: WriteError,
    },
}
