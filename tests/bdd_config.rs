//! Behavioural tests for harness configuration.
//!
//! These tests validate defaults, TOML overrides and cross-field validation
//! using rstest-bdd.

// Test-specific lint exceptions: expect is standard practice in tests
#![expect(clippy::expect_used, reason = "expect is standard practice in tests")]

use clap::ValueEnum;
use gitserver_harness::config::{BrowserKind, HarnessConfig, TimeoutConfig};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then};

/// State shared across configuration test scenarios.
#[derive(Default, ScenarioState)]
struct ConfigState {
    /// The loaded harness configuration.
    config: Slot<HarnessConfig>,
    /// The captured parsing error.
    parse_error: Slot<String>,
}

/// Fixture providing a fresh configuration state.
#[fixture]
fn config_state() -> ConfigState {
    ConfigState::default()
}

fn loaded(config_state: &ConfigState) -> HarnessConfig {
    config_state
        .config
        .get()
        .expect("configuration should be set")
}

// Step definitions

#[given("no configuration is provided")]
fn no_configuration_provided(config_state: &ConfigState) {
    config_state.config.set(HarnessConfig::default());
}

#[given("a configuration file selecting firefox with a visible window")]
fn config_selecting_firefox(config_state: &ConfigState) {
    let toml = r#"
        [browser]
        kind = "firefox"
        headless = false
    "#;
    let config = toml::from_str::<HarnessConfig>(toml).expect("TOML parsing should succeed");
    config_state.config.set(config);
}

#[given("a configuration file with an invalid browser kind")]
fn config_with_invalid_browser_kind(config_state: &ConfigState) {
    let toml = r#"
        [browser]
        kind = "netscape"
    "#;
    let error = toml::from_str::<HarnessConfig>(toml)
        .expect_err("TOML parsing should fail for an invalid browser kind");
    config_state.parse_error.set(error.to_string());
}

#[given("a configuration with a long wait shorter than the short wait")]
fn config_with_inverted_waits(config_state: &ConfigState) {
    let config = HarnessConfig {
        timeouts: TimeoutConfig {
            short_ms: 5_000,
            long_ms: 1_000,
            ..TimeoutConfig::default()
        },
        ..HarnessConfig::default()
    };
    config_state.config.set(config);
}

#[given("a configuration with base URL {url}")]
fn config_with_base_url(config_state: &ConfigState, url: String) {
    let config = HarnessConfig {
        base_url: Some(url),
        ..HarnessConfig::default()
    };
    config_state.config.set(config);
}

#[then("the browser kind is {kind}")]
fn browser_kind_is(config_state: &ConfigState, kind: String) {
    let expected = BrowserKind::from_str(&kind, true).expect("browser kind should be known");
    assert_eq!(loaded(config_state).browser.kind, expected);
}

#[then("the browser runs headless")]
fn browser_runs_headless(config_state: &ConfigState) {
    assert!(
        loaded(config_state).browser.headless,
        "Expected a headless browser"
    );
}

#[then("the browser window is visible")]
fn browser_window_is_visible(config_state: &ConfigState) {
    assert!(
        !loaded(config_state).browser.headless,
        "Expected a visible browser window"
    );
}

#[then("the long wait is {millis} milliseconds")]
fn long_wait_is(config_state: &ConfigState, millis: u64) {
    assert_eq!(loaded(config_state).timeouts.long_ms, millis);
}

#[then("the base URL is {url}")]
fn base_url_is(config_state: &ConfigState, url: String) {
    assert_eq!(loaded(config_state).base_url(), url);
}

#[then("parsing fails mentioning {text}")]
fn parsing_fails_mentioning(config_state: &ConfigState, text: String) {
    let error = config_state
        .parse_error
        .get()
        .expect("parse error should be set");
    assert!(
        error.contains(&text),
        "Error should mention {text}: {error}"
    );
}

#[then("validation fails mentioning {text}")]
fn validation_fails_mentioning(config_state: &ConfigState, text: String) {
    let error = loaded(config_state)
        .validate()
        .expect_err("validation should fail")
        .to_string();
    assert!(
        error.contains(&text),
        "Error should mention {text}: {error}"
    );
}

#[then("the probe address is {address}")]
fn probe_address_is(config_state: &ConfigState, address: String) {
    let actual = loaded(config_state)
        .probe_address()
        .expect("probe address should resolve");
    assert_eq!(actual, address);
}

#[then("the setup paths are reported missing as {fields}")]
fn setup_paths_missing(config_state: &ConfigState, fields: String) {
    let config = loaded(config_state);
    let error = config
        .setup
        .paths()
        .expect_err("setup paths should be missing")
        .to_string();
    assert!(
        error.ends_with(&fields),
        "Error should name {fields}: {error}"
    );
}

// Scenario bindings

#[scenario(
    path = "tests/features/configuration.feature",
    name = "Default configuration values"
)]
fn default_configuration_values(config_state: ConfigState) {
    let _ = config_state;
}

#[scenario(
    path = "tests/features/configuration.feature",
    name = "Configuration file overrides defaults"
)]
fn configuration_file_overrides_defaults(config_state: ConfigState) {
    let _ = config_state;
}

#[scenario(
    path = "tests/features/configuration.feature",
    name = "Invalid browser kind is rejected"
)]
fn invalid_browser_kind_is_rejected(config_state: ConfigState) {
    let _ = config_state;
}

#[scenario(
    path = "tests/features/configuration.feature",
    name = "Inconsistent waits fail validation"
)]
fn inconsistent_waits_fail_validation(config_state: ConfigState) {
    let _ = config_state;
}

#[scenario(
    path = "tests/features/configuration.feature",
    name = "Probe address derives from the base URL"
)]
fn probe_address_derives_from_base_url(config_state: ConfigState) {
    let _ = config_state;
}

#[scenario(
    path = "tests/features/configuration.feature",
    name = "Setup reset needs both paths"
)]
fn setup_reset_needs_both_paths(config_state: ConfigState) {
    let _ = config_state;
}
