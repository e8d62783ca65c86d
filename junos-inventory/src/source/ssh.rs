//! Configuration pulled from a live device through the system `ssh` client.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use super::{parse_raw, ConfigSource, RawDevice, SourceError};
use crate::context::RunContext;
use crate::extract::RawTree;

const SHOW_CONFIGURATION: &str = "show configuration | display xml | no-more";
const SHOW_CHASSIS: &str = "show chassis hardware | display xml | no-more";

/// A device reached with `ssh <host> '<cli command>'`.
///
/// Authentication is left to the ssh client (agent, keys, `~/.ssh/config`).
/// Password prompts are disabled so an unattended run never hangs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHost {
    pub host: String,
    /// Client executable, `ssh` from `PATH` unless overridden.
    pub program: PathBuf,
    /// Also fetch `show chassis hardware`.
    pub chassis: bool,
}

impl RemoteHost {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            program: PathBuf::from("ssh"),
            chassis: false,
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_chassis(mut self, chassis: bool) -> Self {
        self.chassis = chassis;
        self
    }

    fn command(&self, remote: &str, ctx: &RunContext) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-o")
            .arg("BatchMode=yes")
            .arg("-o")
            .arg(format!("ConnectTimeout={}", ctx.timeout.as_secs().max(1)))
            .arg(&self.host)
            .arg(remote);
        command
    }

    /// Run one CLI command on the device and return its stdout.
    fn run(&self, remote: &str, ctx: &RunContext) -> Result<Vec<u8>, SourceError> {
        debug!(host = %self.host, command = remote, "ssh");
        let output = self
            .command(remote, ctx)
            .output()
            .map_err(|source| SourceError::Command {
                host: self.host.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(SourceError::Remote {
                host: self.host.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// Chassis inventory is best effort, like the NSO chassis RPC.
    fn chassis_inventory(&self, ctx: &RunContext) -> Option<RawTree> {
        let result = self
            .run(SHOW_CHASSIS, ctx)
            .and_then(|bytes| parse_raw(&self.label(), &bytes));
        match result {
            Ok(tree) => Some(tree),
            Err(err) => {
                debug!(host = %self.host, error = %err, "chassis inventory unavailable");
                None
            }
        }
    }
}

impl ConfigSource for RemoteHost {
    fn label(&self) -> String {
        format!("ssh:{}", self.host)
    }

    fn fetch(&self, ctx: &RunContext) -> Result<RawDevice, SourceError> {
        if ctx.verbose {
            info!(host = %self.host, "fetching over ssh");
        }
        let config = parse_raw(&self.label(), &self.run(SHOW_CONFIGURATION, ctx)?)?;
        let chassis = if self.chassis {
            self.chassis_inventory(ctx)
        } else {
            None
        };
        Ok(RawDevice {
            label: self.label(),
            config,
            chassis,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::time::Duration;

    use super::{RemoteHost, SHOW_CONFIGURATION};
    use crate::context::RunContext;
    use crate::source::{ConfigSource, SourceError};

    #[test]
    fn command_runs_display_xml_without_prompts() {
        let ctx = RunContext {
            timeout: Duration::from_secs(10),
            ..RunContext::default()
        };
        let host = RemoteHost::new("edge3.example.net");
        let command = host.command(SHOW_CONFIGURATION, &ctx);

        assert_eq!(command.get_program(), OsStr::new("ssh"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(
            args,
            vec![
                "-o",
                "BatchMode=yes",
                "-o",
                "ConnectTimeout=10",
                "edge3.example.net",
                "show configuration | display xml | no-more",
            ]
        );
        assert_eq!(host.label(), "ssh:edge3.example.net");
    }

    #[test]
    fn missing_client_is_a_command_error() {
        let host = RemoteHost::new("edge3").with_program("/nonexistent/bin/ssh");
        match host.fetch(&RunContext::default()) {
            Err(SourceError::Command { host, .. }) => assert_eq!(host, "edge3"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_remote_error() {
        let host = RemoteHost::new("edge3").with_program("false");
        match host.fetch(&RunContext::default()) {
            Err(SourceError::Remote { status, .. }) => assert_eq!(status, Some(1)),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn captured_output_is_parsed_as_configuration() {
        use crate::extract::RawTree;

        // `echo` repeats its arguments, so the host name doubles as the reply
        // and the surrounding options read like a session echo.
        let reply = "<rpc-reply><configuration><system><host-name>edge3</host-name>\
                     </system></configuration></rpc-reply>";
        let device = RemoteHost::new(reply)
            .with_program("echo")
            .with_chassis(true)
            .fetch(&RunContext::default())
            .expect("fetch");
        assert!(device.label.starts_with("ssh:<rpc-reply>"));
        assert!(matches!(device.config, RawTree::Xml(_)));
        assert!(device.chassis.is_some());
    }
}
