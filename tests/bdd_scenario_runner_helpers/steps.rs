//! Given/When steps for feature runner scenarios.

use std::sync::Arc;

use camino::Utf8PathBuf;
use gitserver_harness::config::{DataConfig, HarnessConfig, TimeoutConfig};
use gitserver_harness::scenario::{FeatureRunner, Services};
use gitserver_harness::steps;
use rstest_bdd_macros::{given, when};
use tempfile::TempDir;

use super::fake_console::{FakeCommands, FakeLauncher, FakeProbe};
use super::state::RunnerState;

pub type StepResult<T> = Result<T, String>;

const TEST_DATA: &str = "\
DEPOT=D1
ACCUREV_ADMIN_USERNAME=admin
ACCUREV_ADMIN_PASSWORD=secret
";

const SIGN_IN_FEATURE: &str = r"Feature: Sign in

  @GitURL @smoke
  Scenario: Administrator signs in
    Given Git Server is configured on localhost
    When Valid Git Server User Name and Password are entered
";

const UNKNOWN_KEYS_FEATURE: &str = r#"Feature: Sign in

  @GitURL
  Scenario: Unknown user signs in
    When Valid Git Server User Name "NOBODY" and Password "NO_PASSWORD" are entered
"#;

fn project_root(runner_state: &RunnerState) -> StepResult<Utf8PathBuf> {
    let project = runner_state
        .project
        .get()
        .ok_or_else(|| String::from("project directory should be created"))?;
    Utf8PathBuf::from_path_buf(project.path().to_path_buf())
        .map_err(|path| format!("project path is not UTF-8: {}", path.display()))
}

fn config_for(root: Utf8PathBuf) -> HarnessConfig {
    HarnessConfig {
        base_url: Some(String::from("http://qa-host:8080/git-server")),
        webdriver_url: Some(String::from("http://127.0.0.1:4444")),
        timeouts: TimeoutConfig {
            short_ms: 50,
            long_ms: 100,
            poll_interval_ms: 10,
        },
        data: DataConfig {
            project_dir: root,
            test_data: Utf8PathBuf::from("data.cfg"),
            cli_config: Utf8PathBuf::from("cli.cfg"),
            ..DataConfig::default()
        },
        ..HarnessConfig::default()
    }
}

#[given("a project with administrator credentials")]
fn project_with_credentials(runner_state: &RunnerState) -> StepResult<()> {
    let dir = TempDir::new().map_err(|e| format!("temp dir: {e}"))?;
    std::fs::write(dir.path().join("data.cfg"), TEST_DATA)
        .map_err(|e| format!("write test data: {e}"))?;
    std::fs::write(dir.path().join("cli.cfg"), "SCRATCH_AREA=scratch\n")
        .map_err(|e| format!("write cli config: {e}"))?;
    runner_state.project.set(Arc::new(dir));
    Ok(())
}

#[given("a feature that signs in as the administrator")]
fn feature_signs_in_as_admin(runner_state: &RunnerState) {
    runner_state.feature.set(String::from(SIGN_IN_FEATURE));
}

#[given("a feature that signs in with unknown keys")]
fn feature_signs_in_with_unknown_keys(runner_state: &RunnerState) {
    runner_state.feature.set(String::from(UNKNOWN_KEYS_FEATURE));
}

#[given("a feature with the step {text}")]
fn feature_with_step(runner_state: &RunnerState, text: String) {
    let feature = format!("Feature: Odd steps\n\n  @None\n  Scenario: Odd step\n    Given {text}\n");
    runner_state.feature.set(feature);
}

fn run(runner_state: &RunnerState, tags: &[String]) -> StepResult<()> {
    let root = project_root(runner_state)?;
    let text = runner_state
        .feature
        .get()
        .ok_or_else(|| String::from("feature text should be set"))?;
    let quits = runner_state
        .quits
        .get()
        .ok_or_else(|| String::from("quit counter should be set"))?;

    let path = root.join("inner.feature");
    std::fs::write(&path, text).map_err(|e| format!("write feature: {e}"))?;

    let services = Services {
        launcher: Arc::new(FakeLauncher { quits }),
        commands: Arc::new(FakeCommands),
        probe: Arc::new(FakeProbe),
    };
    let catalogue = steps::catalogue().map_err(|e| format!("catalogue: {e}"))?;
    let runner = FeatureRunner::new(Arc::new(config_for(root)), services, Arc::new(catalogue))
        .with_tag_filter(tags);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("runtime: {e}"))?;
    let report = runtime
        .block_on(runner.run_path(&path))
        .map_err(|e| format!("feature should parse: {e}"))?;
    runner_state.report.set(report);
    Ok(())
}

#[when("the feature is run")]
fn feature_is_run(runner_state: &RunnerState) -> StepResult<()> {
    run(runner_state, &[])
}

#[when("the feature is run with tag filter {tag}")]
fn feature_is_run_with_filter(runner_state: &RunnerState, tag: String) -> StepResult<()> {
    run(runner_state, &[tag])
}
