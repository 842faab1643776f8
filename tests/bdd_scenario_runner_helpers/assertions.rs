//! Then-step assertions for feature runner scenarios.

use std::sync::atomic::Ordering;

use gitserver_harness::scenario::{FeatureReport, ScenarioOutcome};
use rstest_bdd_macros::then;

use super::state::RunnerState;
use super::steps::StepResult;

fn report(runner_state: &RunnerState) -> StepResult<FeatureReport> {
    runner_state
        .report
        .get()
        .ok_or_else(|| String::from("feature report should be recorded"))
}

fn only_outcome(runner_state: &RunnerState) -> StepResult<ScenarioOutcome> {
    let scenarios = report(runner_state)?.scenarios;
    match scenarios.as_slice() {
        [outcome] => Ok(outcome.clone()),
        other => Err(format!("expected one scenario, got {}", other.len())),
    }
}

#[then("the report shows {passed} passed and {failed} failed")]
fn report_shows(runner_state: &RunnerState, passed: usize, failed: usize) -> StepResult<()> {
    let feature = report(runner_state)?;
    if feature.passed() == passed && feature.failed() == failed {
        Ok(())
    } else {
        Err(format!("unexpected report: {feature}"))
    }
}

#[then("the root cause is {cause}")]
fn root_cause_is(runner_state: &RunnerState, cause: String) -> StepResult<()> {
    let outcome = only_outcome(runner_state)?;
    match outcome.root_cause {
        Some(actual) if actual == cause => Ok(()),
        other => Err(format!("expected root cause {cause}, got {other:?}")),
    }
}

#[then("the check {description} failed")]
fn check_failed(runner_state: &RunnerState, description: String) -> StepResult<()> {
    let outcome = only_outcome(runner_state)?;
    let failed = outcome
        .checks
        .iter()
        .any(|record| record.description == description && !record.passed);
    if failed {
        Ok(())
    } else {
        Err(format!("no failed check named {description}"))
    }
}

#[then("the browser was closed {count} times")]
fn browser_closed(runner_state: &RunnerState, count: usize) -> StepResult<()> {
    let quits = runner_state
        .quits
        .get()
        .ok_or_else(|| String::from("quit counter should be set"))?;
    let actual = quits.load(Ordering::SeqCst);
    if actual == count {
        Ok(())
    } else {
        Err(format!("expected {count} browser closes, got {actual}"))
    }
}
