//! Scenario state for feature runner behavioural tests.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use gitserver_harness::scenario::FeatureReport;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;

#[derive(Default, ScenarioState)]
pub(crate) struct RunnerState {
    /// Project directory holding the property files and the feature.
    pub(crate) project: Slot<Arc<TempDir>>,
    /// Text of the feature file to run.
    pub(crate) feature: Slot<String>,
    /// Report of the last run.
    pub(crate) report: Slot<FeatureReport>,
    /// Number of browsers closed across the run.
    pub(crate) quits: Slot<Arc<AtomicUsize>>,
}

#[fixture]
pub(crate) fn runner_state() -> RunnerState {
    let state = RunnerState::default();
    state.quits.set(Arc::new(AtomicUsize::new(0)));
    state
}
