//! Input sources that fetch raw configuration for one device.
//!
//! Sources only fetch and parse; they never retry. Extraction happens later
//! on the returned [`RawDevice`].

pub mod local;
pub mod nso;
pub mod ssh;

use thiserror::Error;

use crate::context::RunContext;
use crate::error::ExtractError;
use crate::extract::RawTree;

pub use local::LocalFile;
pub use nso::{NsoClient, NsoDevice};
pub use ssh::RemoteHost;

/// Raw trees fetched for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDevice {
    /// Where the data came from, for logs and summaries.
    pub label: String,
    pub config: RawTree,
    /// Chassis inventory from a separate fetch, when available.
    pub chassis: Option<RawTree>,
}

/// Errors raised while fetching raw configuration.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed input from {label}: {source}")]
    Malformed {
        label: String,
        source: ExtractError,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to start ssh for {host}: {source}")]
    Command {
        host: String,
        source: std::io::Error,
    },
    #[error("ssh to {host} exited with {}: {stderr}", exit_code(.status))]
    Remote {
        host: String,
        status: Option<i32>,
        stderr: String,
    },
}

fn exit_code(status: &Option<i32>) -> String {
    status.map_or_else(|| "a signal".to_string(), |code| format!("status {code}"))
}

/// Anything that can produce the raw configuration of one device.
pub trait ConfigSource {
    /// Human-readable origin, e.g. a file path or an API device name.
    fn label(&self) -> String;

    fn fetch(&self, ctx: &RunContext) -> Result<RawDevice, SourceError>;
}

/// Parse fetched bytes, tagging failures with the source label.
pub(crate) fn parse_raw(label: &str, bytes: &[u8]) -> Result<RawTree, SourceError> {
    RawTree::from_bytes(bytes).map_err(|source| SourceError::Malformed {
        label: label.to_string(),
        source,
    })
}
