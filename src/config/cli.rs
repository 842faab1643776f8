//! Command-line argument definitions for the harness binary.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for the harness.
#[derive(Debug, Parser)]
#[command(name = "gitserver-harness")]
#[command(
    author,
    version,
    about = "Browser-driven acceptance scenarios for the git server console"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// URL of the git server front-end.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// WebDriver endpoint.
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    /// Root of the CLI test project.
    #[arg(long, global = true)]
    pub project_dir: Option<Utf8PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run scenarios from one or more feature files.
    Run(RunArgs),

    /// Resolve a property key through the scenario property files.
    Lookup(LookupArgs),

    /// Copy the setup template over the server's live configuration.
    ResetSetup,

    /// Check that the server accepts connections.
    Probe,
}

/// Arguments for the `run` subcommand.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Feature files to run.
    #[arg(required = true)]
    pub features: Vec<Utf8PathBuf>,

    /// Only run scenarios carrying this tag (repeatable, without `@`).
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

/// Arguments for the `lookup` subcommand.
#[derive(Debug, Parser)]
pub struct LookupArgs {
    /// Key to resolve.
    #[arg(required = true)]
    pub key: String,

    /// Resolve against the CLI config file instead of the test-data file.
    #[arg(long)]
    pub cli: bool,
}
