//! Defaults, serialisation and validation tests for configuration types.

use camino::Utf8PathBuf;
use rstest::rstest;

use crate::config::tests::helpers::{config_from_full_toml, config_from_partial_toml};
use crate::config::{BrowserKind, HarnessConfig, SetupConfig, TimeoutConfig};
use crate::error::{ConfigError, HarnessError};

#[rstest]
#[case(BrowserKind::Chrome, "\"chrome\"")]
#[case(BrowserKind::Firefox, "\"firefox\"")]
fn browser_kind_serialises_to_lowercase(#[case] kind: BrowserKind, #[case] expected: &str) {
    let serialised = serde_json::to_string(&kind).expect("serialisation should succeed");
    assert_eq!(serialised, expected);
}

#[rstest]
fn full_toml_populates_every_section(#[from(config_from_full_toml)] config: HarnessConfig) {
    assert_eq!(config.base_url(), "http://qa-host:8080/git-server");
    assert_eq!(config.webdriver_url.as_deref(), Some("http://localhost:9515"));
    assert_eq!(config.browser.kind, BrowserKind::Firefox);
    assert!(!config.browser.headless);
    assert_eq!(config.timeouts.poll_interval_ms, 100);
    assert_eq!(config.data.project_dir.as_str(), "/work/cli-tests");
    assert_eq!(config.tool.program, "/usr/local/bin/clitest");
    assert_eq!(config.tool.args, vec!["-k", "{script}"], "args keep defaults");
}

#[rstest]
fn partial_toml_keeps_section_defaults(#[from(config_from_partial_toml)] config: HarnessConfig) {
    assert_eq!(config.base_url(), "http://qa-host/git");
    assert_eq!(config.timeouts, TimeoutConfig::default());
    assert!(config.setup.template.is_none());
}

#[rstest]
fn data_paths_resolve_against_project_dir(#[from(config_from_full_toml)] config: HarnessConfig) {
    assert_eq!(
        config.data.test_data_path(),
        Utf8PathBuf::from("/work/cli-tests/gui_ac/git-server/initial-git-server-depot.cfg")
    );
    assert_eq!(
        config.data.cli_config_path(),
        Utf8PathBuf::from("/work/cli-tests/cli.cfg")
    );
}

#[rstest]
fn default_config_validates() {
    HarnessConfig::default()
        .validate()
        .expect("defaults should validate");
}

#[rstest]
#[case(5_000, 1_000, 250, "timeouts.long_ms")]
#[case(5_000, 30_000, 0, "timeouts.poll_interval_ms")]
fn inconsistent_timeouts_are_rejected(
    #[case] short_ms: u64,
    #[case] long_ms: u64,
    #[case] poll_interval_ms: u64,
    #[case] field: &str,
) {
    let config = HarnessConfig {
        timeouts: TimeoutConfig {
            short_ms,
            long_ms,
            poll_interval_ms,
        },
        ..HarnessConfig::default()
    };

    let error = config.validate().expect_err("validation should fail");
    assert!(
        matches!(error, HarnessError::Config(ConfigError::InvalidValue { field: ref f, .. }) if f == field),
        "unexpected error: {error}"
    );
}

#[rstest]
fn unparseable_base_url_is_rejected() {
    let config = HarnessConfig {
        base_url: Some(String::from("not a url")),
        ..HarnessConfig::default()
    };
    assert!(config.validate().is_err());
}

#[rstest]
#[case(None, "qa-host:8080")]
#[case(Some("10.0.0.5:9000"), "10.0.0.5:9000")]
fn probe_address_prefers_explicit_setting(#[case] address: Option<&str>, #[case] expected: &str) {
    let mut config = HarnessConfig {
        base_url: Some(String::from("http://qa-host:8080/git-server")),
        ..HarnessConfig::default()
    };
    config.probe.address = address.map(String::from);

    assert_eq!(config.probe_address().expect("address should resolve"), expected);
}

#[rstest]
fn probe_address_uses_scheme_default_port() {
    let config = HarnessConfig {
        base_url: Some(String::from("https://qa-host/git-server")),
        ..HarnessConfig::default()
    };
    assert_eq!(
        config.probe_address().expect("address should resolve"),
        "qa-host:443"
    );
}

#[rstest]
fn setup_paths_name_missing_fields() {
    let setup = SetupConfig {
        template: Some(Utf8PathBuf::from("empty_config.properties")),
        ..SetupConfig::default()
    };
    let error = setup.paths().expect_err("live path is missing");
    assert_eq!(
        error.to_string(),
        "missing required configuration: setup.live"
    );
}
