//! `gitserver-harness` entry point.
//!
//! Runs acceptance scenarios against a live git server and offers a few
//! maintenance subcommands. Semantic errors from the library are turned into
//! `eyre` reports here and nowhere else.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/gitserver-harness/config.toml` or the
//!    path from `GITSERVER_HARNESS_CONFIG_PATH`)
//! 3. Environment variables (`GITSERVER_HARNESS_*`)
//! 4. Command-line arguments

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use gitserver_harness::config::{Cli, Commands, HarnessConfig, LookupArgs, RunArgs, load_config};
use gitserver_harness::error::Result as HarnessResult;
use gitserver_harness::probe::{ServiceProbe, TcpProbe};
use gitserver_harness::properties::{EscapePolicy, PropertyMap, reset_live_config};
use gitserver_harness::scenario::{FeatureRunner, Services};
use gitserver_harness::steps;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Installs logging, loads configuration, then dispatches to the subcommand
/// on a current-thread runtime. The exit code is non-zero when any scenario
/// failed.
fn main() -> EyreResult<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(&cli, config)).map_err(Report::from)
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
async fn run(cli: &Cli, config: HarnessConfig) -> HarnessResult<ExitCode> {
    match &cli.command {
        Commands::Run(args) => Ok(run_features(config, args).await),
        Commands::Lookup(args) => lookup(&config, args),
        Commands::ResetSetup => reset_setup(&config).await,
        Commands::Probe => probe(&config).await,
    }
}

/// Run each feature file and print its report.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn run_features(config: HarnessConfig, args: &RunArgs) -> ExitCode {
    let catalogue = match steps::catalogue() {
        Ok(catalogue) => Arc::new(catalogue),
        Err(error) => {
            tracing::error!(error = %error, "step catalogue is malformed");
            return ExitCode::FAILURE;
        }
    };
    let runner = FeatureRunner::new(Arc::new(config), Services::production(), catalogue)
        .with_tag_filter(&args.tags);

    let mut all_passed = true;
    for path in &args.features {
        match runner.run_path(path).await {
            Ok(report) => {
                println!("{report}");
                all_passed &= report.all_passed();
            }
            Err(error) => {
                tracing::error!(path = %path, error = %error, "feature could not be run");
                all_passed = false;
            }
        }
    }

    if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print the value of a property key, or the not-found sentinel.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn lookup(config: &HarnessConfig, args: &LookupArgs) -> HarnessResult<ExitCode> {
    let (path, policy) = if args.cli {
        (config.data.cli_config_path(), EscapePolicy::Raw)
    } else {
        (config.data.test_data_path(), EscapePolicy::Escaped)
    };
    let properties = PropertyMap::load(&path, policy)?;
    println!("{}", properties.lookup(&args.key));
    Ok(ExitCode::SUCCESS)
}

/// Copy the setup template over the live product configuration.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn reset_setup(config: &HarnessConfig) -> HarnessResult<ExitCode> {
    let (template, live) = config.setup.paths()?;
    let copied = reset_live_config(template, live, config.setup.settle()).await?;
    println!("Copied {copied} bytes from {template} to {live}");
    Ok(ExitCode::SUCCESS)
}

/// Check that the server accepts connections.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn probe(config: &HarnessConfig) -> HarnessResult<ExitCode> {
    let address = config.probe_address()?;
    TcpProbe.check(&address, config.probe.timeout()).await?;
    println!("Git server at {address} is reachable");
    Ok(ExitCode::SUCCESS)
}
