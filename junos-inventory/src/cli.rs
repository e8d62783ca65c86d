use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "junos-inventory")]
#[command(about = "Normalize JunOS configuration exports into equipment inventory records")]
pub struct Cli {
    /// Log each fetch and write; raises the default log level to debug.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Process every source listed in a TOML run configuration.
    Run(RunArgs),
    /// Parse one or more local configuration exports.
    Parse(ParseArgs),
    /// Print which extractor recognises a configuration file.
    Detect(DetectArgs),
    /// Fetch device configurations from an NSO RESTCONF API.
    Nso(NsoArgs),
    /// Fetch configurations from live devices with the system ssh client.
    Ssh(SshArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory receiving one `<name>.json` per device.
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,
    /// Print records to stdout instead of writing files.
    #[arg(short = 'n', long)]
    pub no_write: bool,
    /// Format of the run summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    #[arg(short = 'C', long)]
    pub config: PathBuf,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct ParseArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Chassis-inventory export for the device; needs exactly one file.
    #[arg(long)]
    pub chassis: Option<PathBuf>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct DetectArgs {
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct NsoArgs {
    /// RESTCONF base URL, e.g. `https://nso:8888/api/running`.
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub password: String,
    /// Only fetch these devices; repeatable.
    #[arg(long = "device")]
    pub devices: Vec<String>,
    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct SshArgs {
    #[arg(required = true)]
    pub hosts: Vec<String>,
    /// Also fetch `show chassis hardware`.
    #[arg(long)]
    pub chassis: bool,
    /// ssh client to run instead of `ssh` from `PATH`.
    #[arg(long)]
    pub program: Option<PathBuf>,
    /// Connect timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
