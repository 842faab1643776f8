//! Behavioural tests for the harness CLI.
//!
//! These tests validate argument parsing for each subcommand using
//! rstest-bdd.

use clap::Parser;
use clap::error::ErrorKind;
use gitserver_harness::config::{Cli, Commands};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then};

/// State shared across CLI test scenarios.
#[derive(Default, ScenarioState)]
struct CliState {
    /// Rendered help or version text.
    output: Slot<String>,
    /// Any error message from parsing.
    error: Slot<String>,
    /// Subcommand name when parsing succeeded.
    command: Slot<String>,
    /// Tag filter of a parsed `run`.
    tags: Slot<Vec<String>>,
}

/// Fixture providing a fresh CLI state.
#[fixture]
fn cli_state() -> CliState {
    CliState::default()
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Run(_) => "run",
        Commands::Lookup(_) => "lookup",
        Commands::ResetSetup => "reset-setup",
        Commands::Probe => "probe",
    }
}

// Step definitions

#[given("the CLI is invoked with {args}")]
fn invoke_with(cli_state: &CliState, args: String) {
    let argv = std::iter::once("gitserver-harness").chain(args.split_whitespace());
    match Cli::try_parse_from(argv) {
        Ok(cli) => {
            if let Commands::Run(run) = &cli.command {
                cli_state.tags.set(run.tags.clone());
            }
            cli_state.command.set(command_name(&cli.command).to_owned());
        }
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                cli_state.output.set(error.to_string());
            }
            _ => cli_state.error.set(error.to_string()),
        },
    }
}

#[then("the output contains {text}")]
#[expect(
    clippy::expect_used,
    reason = "test assertion - panic on missing state is intentional"
)]
fn output_contains(cli_state: &CliState, text: String) {
    let output = cli_state
        .output
        .get()
        .expect("output should be set before checking");
    assert!(
        output.contains(&text),
        "Expected output to contain '{text}', but got:\n{output}"
    );
}

#[then("the {name} command is selected")]
#[expect(
    clippy::expect_used,
    reason = "test assertion - panic on missing state is intentional"
)]
fn command_is_selected(cli_state: &CliState, name: String) {
    let command = cli_state
        .command
        .get()
        .expect("invocation should have parsed");
    assert_eq!(command, name);
}

#[then("the tag filter is {tags}")]
#[expect(
    clippy::expect_used,
    reason = "test assertion - panic on missing state is intentional"
)]
fn tag_filter_is(cli_state: &CliState, tags: String) {
    let parsed = cli_state.tags.get().expect("run should have parsed");
    let expected: Vec<String> = tags.split(", ").map(str::to_owned).collect();
    assert_eq!(parsed, expected);
}

#[then("an error mentions {text}")]
#[expect(
    clippy::expect_used,
    reason = "test assertion - panic on missing state is intentional"
)]
fn error_mentions(cli_state: &CliState, text: String) {
    let error = cli_state
        .error
        .get()
        .expect("error should be set before checking");
    assert!(
        error.contains(&text),
        "Expected error to mention '{text}', but got:\n{error}"
    );
}

// Scenario bindings

#[scenario(path = "tests/features/cli.feature", name = "Display help information")]
fn display_help_information(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Display version information"
)]
fn display_version_information(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Run command requires a feature file"
)]
fn run_requires_feature_file(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Run command collects tag filters"
)]
fn run_collects_tag_filters(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Lookup command requires a key"
)]
fn lookup_requires_key(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Probe command accepts a base URL"
)]
fn probe_accepts_base_url(cli_state: CliState) {
    let _ = cli_state;
}
