use std::path::PathBuf;
use std::time::Duration;

/// Default directory records are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "./json/";

/// Where finished records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Print each record to standard output; nothing touches the disk.
    Stdout,
    /// Write `<dir>/<name>.json` per record.
    Directory(PathBuf),
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Directory(PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

/// Settings for one run, handed explicitly to sources and writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub output: OutputMode,
    /// Report each fetch and write at `info` level instead of `debug`.
    pub verbose: bool,
    /// Per-request timeout for network sources.
    pub timeout: Duration,
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            output: OutputMode::default(),
            verbose: false,
            timeout: Duration::from_secs(30),
        }
    }
}
