//! Integration tests for the `load_config()` public API.
//!
//! These tests drive `load_config()` from parsed CLI arguments through file
//! and environment layers to the final, validated configuration.

#![expect(clippy::expect_used, reason = "expect is standard practice in tests")]


use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use gitserver_harness::config::{BrowserKind, Cli, load_config};
use gitserver_harness::error::{ConfigError, HarnessError};
use serial_test::serial;
use tempfile::NamedTempFile;
use test_utils::{clear_harness_env, set_env_var};

/// Parse `args` after the binary name.
fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("gitserver-harness").chain(args.iter().copied()))
        .expect("arguments should parse")
}

/// A `probe` invocation reading `config_path`.
fn cli_with_config(config_path: &Utf8PathBuf) -> Cli {
    cli(&["probe", "--config", config_path.as_str()])
}

/// Create a temporary config file with the given TOML content.
fn temp_config_file(content: &str) -> std::io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

fn utf8_path(file: &NamedTempFile) -> Utf8PathBuf {
    Utf8PathBuf::try_from(file.path().to_path_buf()).expect("path should be valid UTF-8")
}

#[test]
#[serial]
fn load_config_returns_defaults_when_no_sources_provided() {
    let _guard = clear_harness_env();

    let config = load_config(&cli(&["probe", "--config", "/nonexistent/config.toml"]))
        .expect("load_config should succeed with defaults");

    assert!(config.base_url.is_none());
    assert_eq!(config.browser.kind, BrowserKind::Chrome);
    assert!(config.browser.headless);
    assert_eq!(config.timeouts.long_ms, 30_000);
    assert_eq!(config.data.required_key, "DEPOT");
}

#[test]
#[serial]
fn load_config_loads_from_config_file() {
    let _guard = clear_harness_env();

    let config_file = temp_config_file(
        r#"
        base_url = "http://qa-host:8080/git-server/"

        [browser]
        kind = "firefox"

        [data]
        project_dir = "/work/cli-tests"
        "#,
    )
    .expect("failed to create temp config");

    let config = load_config(&cli_with_config(&utf8_path(&config_file)))
        .expect("load_config should succeed");

    assert_eq!(config.base_url(), "http://qa-host:8080/git-server");
    assert_eq!(config.browser.kind, BrowserKind::Firefox);
    assert!(config.browser.headless, "unset fields keep their defaults");
    assert_eq!(
        config.data.test_data_path(),
        "/work/cli-tests/gui_ac/git-server/initial-git-server-depot.cfg"
    );
}

#[test]
#[serial]
fn environment_overrides_file_and_cli_overrides_environment() {
    let guard = clear_harness_env();

    let config_file = temp_config_file(
        r#"
        base_url = "http://from-file/git"

        [timeouts]
        long_ms = 10000
        "#,
    )
    .expect("failed to create temp config");
    set_env_var(&guard, "GITSERVER_HARNESS_BASE_URL", "http://from-env/git");
    set_env_var(&guard, "GITSERVER_HARNESS_TIMEOUTS_LONG_MS", "20000");

    let path = utf8_path(&config_file);
    let from_env = load_config(&cli_with_config(&path)).expect("load_config should succeed");
    assert_eq!(from_env.base_url(), "http://from-env/git");
    assert_eq!(from_env.timeouts.long_ms, 20_000);

    let from_cli = load_config(&cli(&[
        "probe",
        "--config",
        path.as_str(),
        "--base-url",
        "http://from-cli/git",
    ]))
    .expect("load_config should succeed");
    assert_eq!(from_cli.base_url(), "http://from-cli/git");
    assert_eq!(from_cli.timeouts.long_ms, 20_000);
}

#[test]
#[serial]
fn load_config_rejects_malformed_config_file() {
    let _guard = clear_harness_env();

    let config_file =
        temp_config_file("this is not valid TOML {{{").expect("failed to create temp config");

    let error = load_config(&cli_with_config(&utf8_path(&config_file)))
        .expect_err("load_config should fail for malformed TOML");
    assert!(matches!(
        error,
        HarnessError::Config(ConfigError::ParseError { .. })
    ));
}

#[test]
#[serial]
fn load_config_fails_on_invalid_bool_env_var() {
    let guard = clear_harness_env();
    set_env_var(&guard, "GITSERVER_HARNESS_BROWSER_HEADLESS", "maybe");

    let error = load_config(&cli(&["probe", "--config", "/nonexistent/config.toml"]))
        .expect_err("load_config should fail for invalid bool");
    let message = error.to_string();
    assert!(
        message.contains("GITSERVER_HARNESS_BROWSER_HEADLESS"),
        "error should mention the env var: {message}"
    );
    assert!(
        message.contains("expected bool"),
        "error should explain expected type: {message}"
    );
}

#[test]
#[serial]
fn load_config_fails_on_inconsistent_timeouts() {
    let _guard = clear_harness_env();

    let config_file = temp_config_file(
        r"
        [timeouts]
        short_ms = 5000
        long_ms = 1000
        ",
    )
    .expect("failed to create temp config");

    let error = load_config(&cli_with_config(&utf8_path(&config_file)))
        .expect_err("long wait shorter than short wait should be rejected");
    assert!(error.to_string().contains("timeouts.long_ms"));
}

#[test]
#[serial]
fn project_dir_flag_moves_every_data_path() {
    let _guard = clear_harness_env();

    let config = load_config(&cli(&[
        "lookup",
        "DEPOT",
        "--config",
        "/nonexistent/config.toml",
        "--project-dir",
        "/srv/cli",
    ]))
    .expect("load_config should succeed");

    assert_eq!(config.data.cli_config_path(), "/srv/cli/cli.cfg");
}
