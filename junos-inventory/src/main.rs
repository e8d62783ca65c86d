use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use junos_inventory::config::{load_config, NsoConfig};
use junos_inventory::context::{OutputMode, RunContext, DEFAULT_OUTPUT_DIR};
use junos_inventory::extract::{detect_extractor, RawTree};
use junos_inventory::pipeline::run_batch;
use junos_inventory::source::{ConfigSource, LocalFile, NsoClient, NsoDevice, RemoteHost, SourceError};
use junos_inventory::summary::{render_text, BatchSummary, DeviceOutcome, OutcomeStatus};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{
    Cli, Command, DetectArgs, NsoArgs, OutputArgs, OutputFormat, ParseArgs, RunArgs, SshArgs,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => run_config(args, cli.verbose),
        Command::Parse(args) => run_parse(args, cli.verbose),
        Command::Detect(args) => run_detect(args),
        Command::Nso(args) => run_nso(args, cli.verbose),
        Command::Ssh(args) => run_ssh(args, cli.verbose),
    }
}

/// Logs go to stderr so stdout mode stays pure JSON.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn context(args: &OutputArgs, dir: Option<PathBuf>, stdout: bool, verbose: bool) -> RunContext {
    // An explicit --output-dir beats `stdout = true` from the config file.
    let output = if args.no_write || (stdout && args.output_dir.is_none()) {
        OutputMode::Stdout
    } else {
        let dir = args
            .output_dir
            .clone()
            .or(dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        OutputMode::Directory(dir)
    };
    RunContext {
        output,
        verbose,
        ..RunContext::default()
    }
}

fn run_config(args: RunArgs, verbose: bool) -> Result<()> {
    let config = load_config(&args.config)?;
    let ctx = context(
        &args.output,
        config.output.dir.clone(),
        config.output.stdout,
        verbose,
    );

    let mut sources: Vec<Box<dyn ConfigSource>> = config
        .local_sources()
        .into_iter()
        .map(|source| Box::new(source) as Box<dyn ConfigSource>)
        .collect();
    sources.extend(
        config
            .remote_sources()
            .into_iter()
            .map(|host| Box::new(host) as Box<dyn ConfigSource>),
    );
    // A failed NSO listing is one failed entry; the other sources still run.
    let mut unreachable = None;
    if let Some(nso) = &config.nso {
        match nso_devices(nso, &ctx) {
            Ok(devices) => sources.extend(devices),
            Err(err) => {
                warn!(url = %nso.url, error = %err, "failed to list NSO devices");
                unreachable = Some(
                    DeviceOutcome::new(format!("nso:{}", nso.url), OutcomeStatus::Failed)
                        .error(&err),
                );
            }
        }
    }
    if sources.is_empty() && unreachable.is_none() {
        bail!("no sources configured in {}", args.config.display());
    }

    let mut summary = run(&sources, &ctx);
    if let Some(outcome) = unreachable {
        summary.push(outcome);
    }
    finish(summary, &args.output, &ctx)
}

fn nso_devices(
    nso: &NsoConfig,
    ctx: &RunContext,
) -> Result<Vec<Box<dyn ConfigSource>>, SourceError> {
    let client = NsoClient::new(&nso.url, &nso.user, &nso.password, ctx)?;
    Ok(NsoDevice::all(Rc::new(client), &nso.devices)?
        .into_iter()
        .map(|device| Box::new(device) as Box<dyn ConfigSource>)
        .collect())
}

fn run_parse(args: ParseArgs, verbose: bool) -> Result<()> {
    if args.chassis.is_some() && args.files.len() != 1 {
        bail!("--chassis needs exactly one configuration file");
    }
    let ctx = context(&args.output, None, false, verbose);

    let sources: Vec<Box<dyn ConfigSource>> = args
        .files
        .iter()
        .map(|path| {
            let source = LocalFile::new(path);
            let source = match &args.chassis {
                Some(chassis) => source.with_chassis(chassis),
                None => source,
            };
            Box::new(source) as Box<dyn ConfigSource>
        })
        .collect();

    finish(run(&sources, &ctx), &args.output, &ctx)
}

fn run_detect(args: DetectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;
    let raw = RawTree::from_bytes(&bytes)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    match detect_extractor(&raw) {
        Some(extractor) => println!(
            "format={} producer={} encoding={}",
            extractor.name(),
            extractor.producer(),
            raw.encoding()
        ),
        None => println!("format=unknown encoding={}", raw.encoding()),
    }
    Ok(())
}

fn run_nso(args: NsoArgs, verbose: bool) -> Result<()> {
    let mut ctx = context(&args.output, None, false, verbose);
    ctx.timeout = Duration::from_secs(args.timeout);

    let client = NsoClient::new(&args.url, &args.user, &args.password, &ctx)
        .context("failed to create NSO client")?;
    let sources: Vec<Box<dyn ConfigSource>> = NsoDevice::all(Rc::new(client), &args.devices)
        .with_context(|| format!("failed to list devices from {}", args.url))?
        .into_iter()
        .map(|device| Box::new(device) as Box<dyn ConfigSource>)
        .collect();

    finish(run(&sources, &ctx), &args.output, &ctx)
}

fn run_ssh(args: SshArgs, verbose: bool) -> Result<()> {
    let mut ctx = context(&args.output, None, false, verbose);
    ctx.timeout = Duration::from_secs(args.timeout);

    let sources: Vec<Box<dyn ConfigSource>> = args
        .hosts
        .iter()
        .map(|host| {
            let host = RemoteHost::new(host).with_chassis(args.chassis);
            let host = match &args.program {
                Some(program) => host.with_program(program),
                None => host,
            };
            Box::new(host) as Box<dyn ConfigSource>
        })
        .collect();

    finish(run(&sources, &ctx), &args.output, &ctx)
}

fn run(sources: &[Box<dyn ConfigSource>], ctx: &RunContext) -> BatchSummary {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    run_batch(sources, ctx, &mut lock)
}

/// Print the summary and fail the process if any device failed.
///
/// In stdout mode the summary goes to stderr after the records.
fn finish(summary: BatchSummary, args: &OutputArgs, ctx: &RunContext) -> Result<()> {
    let rendered = match args.format {
        OutputFormat::Text => render_text(&summary),
        OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
    };
    match ctx.output {
        OutputMode::Stdout => eprintln!("{rendered}"),
        OutputMode::Directory(_) => println!("{rendered}"),
    }

    let failed = summary.failed();
    if failed > 0 {
        bail!("{failed} of {} device(s) failed", summary.devices.len());
    }
    Ok(())
}
