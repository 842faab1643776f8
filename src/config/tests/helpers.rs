//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use ortho_config::MergeComposer;
use rstest::fixture;

use crate::config::{BrowserKind, DEFAULT_BASE_URL, HarnessConfig};

/// Fixture providing a `HarnessConfig` parsed from a full TOML example.
#[fixture]
pub fn config_from_full_toml() -> HarnessConfig {
    let toml = r#"
        base_url = "http://qa-host:8080/git-server"
        webdriver_url = "http://localhost:9515"

        [browser]
        kind = "firefox"
        headless = false

        [timeouts]
        short_ms = 1000
        long_ms = 20000
        poll_interval_ms = 100

        [data]
        project_dir = "/work/cli-tests"
        required_key = "DEPOT"

        [setup]
        template = "/work/cli-tests/empty_config.properties"
        live = "/opt/gitserver/config.properties"

        [tool]
        program = "/usr/local/bin/clitest"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing a `HarnessConfig` parsed from a minimal TOML example.
#[fixture]
pub fn config_from_partial_toml() -> HarnessConfig {
    toml::from_str(r#"base_url = "http://qa-host/git""#).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with the defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(HarnessConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `HarnessConfig`.
pub fn merge_config(
    composer: MergeComposer,
) -> Result<HarnessConfig, Arc<ortho_config::OrthoError>> {
    HarnessConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &HarnessConfig) {
    assert!(config.base_url.is_none(), "base_url should be None");
    assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    assert!(config.webdriver_url.is_none(), "webdriver_url should be None");
    assert_eq!(config.browser.kind, BrowserKind::Chrome);
    assert!(config.browser.headless, "browser.headless should be true");
    assert_eq!(config.timeouts.short_ms, 5_000);
    assert_eq!(config.timeouts.long_ms, 30_000);
    assert_eq!(config.timeouts.poll_interval_ms, 250);
    assert_eq!(config.data.project_dir.as_str(), ".");
    assert_eq!(config.data.cli_config.as_str(), "cli.cfg");
    assert_eq!(config.data.required_key, "DEPOT");
    assert_eq!(config.setup.settle_ms, 250);
    assert_eq!(config.tool.program, "clitest");
    assert_eq!(config.tool.args, vec!["-k", "{script}"]);
    assert_eq!(config.tool.scratch_key, "SCRATCH_AREA");
}

/// Helper: Creates a `MergeComposer` with defaults, file and env layers.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "base_url": "http://from-file:8080/git",
            "webdriver_url": "http://file-driver:4444"
        }),
        None,
    );

    composer.push_environment(json!({
        "base_url": "http://from-env:8080/git"
    }));

    Ok(composer)
}
