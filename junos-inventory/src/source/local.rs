use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{parse_raw, ConfigSource, RawDevice, SourceError};
use crate::context::RunContext;
use crate::extract::RawTree;

/// Configuration export stored on disk, XML or JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    /// Matching chassis-inventory export, if one was saved.
    pub chassis: Option<PathBuf>,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            chassis: None,
        }
    }

    pub fn with_chassis(mut self, chassis: impl Into<PathBuf>) -> Self {
        self.chassis = Some(chassis.into());
        self
    }
}

fn read_tree(path: &Path) -> Result<RawTree, SourceError> {
    let label = path.display().to_string();
    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: label.clone(),
        source,
    })?;
    parse_raw(&label, &bytes)
}

impl ConfigSource for LocalFile {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self, ctx: &RunContext) -> Result<RawDevice, SourceError> {
        if ctx.verbose {
            info!(path = %self.path.display(), "reading configuration");
        } else {
            debug!(path = %self.path.display(), "reading configuration");
        }
        let config = read_tree(&self.path)?;
        let chassis = self.chassis.as_deref().map(read_tree).transpose()?;
        Ok(RawDevice {
            label: self.label(),
            config,
            chassis,
        })
    }
}
