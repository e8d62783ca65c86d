use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::source::{LocalFile, RemoteHost};

/// Run configuration read with `run -C <file>`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    pub nso: Option<NsoConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub stdout: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// Plain configuration exports.
    #[serde(default)]
    pub local: Vec<PathBuf>,
    /// Exports paired with a chassis-inventory file.
    #[serde(default)]
    pub file: Vec<FileSource>,
    /// Live devices reached over ssh.
    #[serde(default)]
    pub remote: Vec<RemoteSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSource {
    pub config: PathBuf,
    pub chassis: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteSource {
    pub host: String,
    #[serde(default)]
    pub chassis: bool,
    /// ssh client to run instead of `ssh` from `PATH`.
    pub program: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NsoConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    /// Restrict the run to these devices; empty means all of them.
    #[serde(default)]
    pub devices: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load a run configuration. Relative paths inside the file are resolved
/// against the directory holding it.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = parse_config(&raw, path.display().to_string())?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_paths(base))
}

fn parse_config(raw: &str, path: String) -> Result<RunConfig, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::Parse { path, source })
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl RunConfig {
    fn resolve_paths(mut self, base: &Path) -> Self {
        self.output.dir = self.output.dir.map(|dir| resolve(base, &dir));
        for path in &mut self.sources.local {
            *path = resolve(base, path);
        }
        for file in &mut self.sources.file {
            file.config = resolve(base, &file.config);
            file.chassis = file.chassis.as_deref().map(|c| resolve(base, c));
        }
        self
    }

    /// Local sources in file order: `local` entries first, then `file` tables.
    pub fn local_sources(&self) -> Vec<LocalFile> {
        let plain = self.sources.local.iter().map(LocalFile::new);
        let paired = self.sources.file.iter().map(|file| {
            let source = LocalFile::new(&file.config);
            match &file.chassis {
                Some(chassis) => source.with_chassis(chassis),
                None => source,
            }
        });
        plain.chain(paired).collect()
    }

    /// Remote hosts in file order.
    pub fn remote_sources(&self) -> Vec<RemoteHost> {
        self.sources
            .remote
            .iter()
            .map(|remote| {
                let host = RemoteHost::new(&remote.host).with_chassis(remote.chassis);
                match &remote.program {
                    Some(program) => host.with_program(program),
                    None => host,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::{load_config, parse_config, ConfigError, RunConfig};

    #[test]
    fn empty_file_is_all_defaults() {
        let config = parse_config("", "inline".to_string()).expect("parse");
        assert_eq!(config, RunConfig::default());
        assert!(config.local_sources().is_empty());
    }

    #[test]
    fn relative_paths_follow_config_location() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("inventory.toml");
        fs::write(
            &path,
            r#"
[output]
dir = "out"

[sources]
local = ["configs/r1.xml", "/abs/r2.xml"]

[[sources.file]]
config = "configs/r3.xml"
chassis = "configs/r3-chassis.xml"

[[sources.remote]]
host = "edge3.example.net"
chassis = true

[nso]
url = "https://nso.example.net/api/running"
user = "reader"
password = "secret"
devices = ["edge1"]
"#,
        )
        .expect("write config");

        let config = load_config(&path).expect("load");
        assert_eq!(config.output.dir, Some(dir.path().join("out")));
        assert!(!config.output.stdout);

        let sources = config.local_sources();
        let paths: Vec<_> = sources.iter().map(|s| s.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                dir.path().join("configs/r1.xml"),
                PathBuf::from("/abs/r2.xml"),
                dir.path().join("configs/r3.xml"),
            ]
        );
        assert_eq!(
            sources[2].chassis,
            Some(dir.path().join("configs/r3-chassis.xml"))
        );
        let remote = config.remote_sources();
        assert_eq!(remote.len(), 1);
        assert_eq!(remote[0].host, "edge3.example.net");
        assert_eq!(remote[0].program, PathBuf::from("ssh"));
        assert!(remote[0].chassis);
        assert_eq!(config.nso.map(|n| n.devices), Some(vec!["edge1".to_string()]));
    }

    #[test]
    fn reports_missing_and_invalid_files() {
        let dir = tempdir().expect("tempdir");
        assert!(matches!(
            load_config(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[output]\ndir = \n").expect("write");
        assert!(matches!(load_config(&broken), Err(ConfigError::Parse { .. })));

        let unknown = dir.path().join("unknown.toml");
        fs::write(&unknown, "[output]\nformat = \"xml\"\n").expect("write");
        assert!(matches!(
            load_config(&unknown),
            Err(ConfigError::Parse { .. })
        ));
    }
}
