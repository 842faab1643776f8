//! Gherkin feature runner.
//!
//! A feature file is flattened into independent scenarios before anything
//! runs. Background steps (feature, then rule) are prepended to each
//! scenario. A scenario outline becomes one scenario per example row, with
//! `<column>` placeholders substituted into the step text. Each scenario
//! then runs in its own [`ScenarioContext`] with the hooks around it.

use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use gherkin::{Feature, GherkinEnv, Scenario, Step};

use super::{CheckRecord, ScenarioContext, Services, Severity, StepCatalogue, hooks};
use crate::config::HarnessConfig;
use crate::error::{CheckError, HarnessError, Result, StepError};

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Scenario name; outline rows carry their example number.
    pub name: String,
    /// Effective tags, without `@`.
    pub tags: Vec<String>,
    /// Whether the scenario ran to completion.
    pub passed: bool,
    /// Why the scenario stopped: the first fatal check or the error.
    pub root_cause: Option<String>,
    /// Every check recorded, oldest first.
    pub checks: Vec<CheckRecord>,
}

impl ScenarioOutcome {
    /// Failed checks that did not stop the scenario.
    #[must_use]
    pub fn soft_failures(&self) -> usize {
        self.checks
            .iter()
            .filter(|record| !record.passed && record.severity == Severity::Continue)
            .count()
    }
}

impl fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "PASS  {}", self.name)?;
        } else {
            write!(f, "FAIL  {}", self.name)?;
            if let Some(cause) = &self.root_cause {
                write!(f, ": {cause}")?;
            }
        }
        let soft = self.soft_failures();
        if soft > 0 {
            write!(f, " [{soft} non-fatal check(s) failed]")?;
        }
        Ok(())
    }
}

/// Results for one feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureReport {
    /// Feature name.
    pub name: String,
    /// File the feature was read from.
    pub path: Utf8PathBuf,
    /// Scenario results in file order.
    pub scenarios: Vec<ScenarioOutcome>,
}

impl FeatureReport {
    /// Number of scenarios that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|outcome| outcome.passed).count()
    }

    /// Number of scenarios that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    /// Whether every selected scenario passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(|outcome| outcome.passed)
    }
}

impl fmt::Display for FeatureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Feature: {} ({})", self.name, self.path)?;
        for outcome in &self.scenarios {
            writeln!(f, "  {outcome}")?;
        }
        write!(f, "{} passed, {} failed", self.passed(), self.failed())
    }
}

/// A scenario ready to run: background included, placeholders filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedScenario {
    pub(crate) name: String,
    pub(crate) tags: Vec<String>,
    pub(crate) steps: Vec<String>,
}

/// Runs feature files through a step catalogue.
#[derive(Debug, Clone)]
pub struct FeatureRunner {
    config: Arc<HarnessConfig>,
    services: Services,
    catalogue: Arc<StepCatalogue>,
    tag_filter: Vec<String>,
}

impl FeatureRunner {
    /// A runner that selects every scenario.
    #[must_use]
    pub const fn new(
        config: Arc<HarnessConfig>,
        services: Services,
        catalogue: Arc<StepCatalogue>,
    ) -> Self {
        Self {
            config,
            services,
            catalogue,
            tag_filter: Vec::new(),
        }
    }

    /// Run only scenarios carrying at least one of `tags`.
    #[must_use]
    pub fn with_tag_filter(mut self, tags: &[String]) -> Self {
        self.tag_filter = tags.iter().map(|tag| normalise_tag(tag)).collect();
        self
    }

    /// Whether a scenario with `tags` passes the filter.
    #[must_use]
    pub fn selects(&self, tags: &[String]) -> bool {
        self.tag_filter.is_empty()
            || tags
                .iter()
                .any(|tag| self.tag_filter.iter().any(|wanted| *wanted == normalise_tag(tag)))
    }

    /// Parse and run the feature file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StepError::FeatureParse` when the file cannot be parsed.
    /// Scenario failures are reported in the returned [`FeatureReport`].
    pub async fn run_path(&self, path: &Utf8Path) -> Result<FeatureReport> {
        let feature = Feature::parse_path(path.as_std_path(), GherkinEnv::default()).map_err(
            |error| StepError::FeatureParse {
                path: path.to_path_buf(),
                message: error.to_string(),
            },
        )?;
        Ok(self.run_feature(&feature, path).await)
    }

    /// Run every selected scenario of a parsed feature.
    pub async fn run_feature(&self, feature: &Feature, path: &Utf8Path) -> FeatureReport {
        tracing::info!(feature = %feature.name, path = %path, "running feature");
        let mut scenarios = Vec::new();
        for planned in plan(feature) {
            if !self.selects(&planned.tags) {
                tracing::debug!(scenario = %planned.name, "skipped by tag filter");
                continue;
            }
            scenarios.push(
                self.run_scenario(&planned.name, planned.tags, &planned.steps)
                    .await,
            );
        }

        FeatureReport {
            name: feature.name.clone(),
            path: path.to_path_buf(),
            scenarios,
        }
    }

    /// Run one scenario: hooks, then each step in order, then teardown.
    ///
    /// Teardown runs whether or not a step failed.
    pub async fn run_scenario(
        &self,
        name: &str,
        tags: Vec<String>,
        steps: &[String],
    ) -> ScenarioOutcome {
        let mut ctx = ScenarioContext::new(
            name,
            tags.clone(),
            Arc::clone(&self.config),
            self.services.clone(),
        );

        let result = self.execute(&mut ctx, steps).await;
        if let Err(error) = &result {
            tracing::error!(scenario = name, error = %error, "scenario failed");
        }
        hooks::after_scenario(&mut ctx).await;

        let root_cause = match result {
            Ok(()) => None,
            Err(HarnessError::Check(CheckError::Fatal { description, .. })) => Some(description),
            Err(other) => Some(other.to_string()),
        };
        ScenarioOutcome {
            name: name.to_owned(),
            tags,
            passed: root_cause.is_none(),
            root_cause,
            checks: ctx.into_checks().into_records(),
        }
    }

    async fn execute(&self, ctx: &mut ScenarioContext, steps: &[String]) -> Result<()> {
        hooks::before_scenario(ctx).await?;
        for step in steps {
            ctx.watch_console().await;
            self.catalogue.dispatch(ctx, step).await?;
        }
        Ok(())
    }
}

fn normalise_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('@').to_owned()
}

fn step_texts(steps: &[Step]) -> impl Iterator<Item = String> + '_ {
    steps.iter().map(|step| step.value.clone())
}

/// Flatten a feature into runnable scenarios.
pub(crate) fn plan(feature: &Feature) -> Vec<PlannedScenario> {
    let feature_background: Vec<String> = feature
        .background
        .as_ref()
        .map(|background| step_texts(&background.steps).collect())
        .unwrap_or_default();
    let feature_tags: Vec<String> = feature.tags.iter().map(|tag| normalise_tag(tag)).collect();

    let mut planned = Vec::new();
    for scenario in &feature.scenarios {
        planned.extend(expand(scenario, &feature_tags, &feature_background));
    }

    for rule in &feature.rules {
        let mut background = feature_background.clone();
        if let Some(rule_background) = &rule.background {
            background.extend(step_texts(&rule_background.steps));
        }
        let mut tags = feature_tags.clone();
        tags.extend(rule.tags.iter().map(|tag| normalise_tag(tag)));
        for scenario in &rule.scenarios {
            planned.extend(expand(scenario, &tags, &background));
        }
    }
    planned
}

fn expand(scenario: &Scenario, inherited_tags: &[String], background: &[String]) -> Vec<PlannedScenario> {
    let mut tags = inherited_tags.to_vec();
    tags.extend(scenario.tags.iter().map(|tag| normalise_tag(tag)));

    let own_steps: Vec<String> = step_texts(&scenario.steps).collect();
    if scenario.examples.is_empty() {
        let mut steps = background.to_vec();
        steps.extend(own_steps);
        return vec![PlannedScenario {
            name: scenario.name.clone(),
            tags,
            steps,
        }];
    }

    let mut planned = Vec::new();
    let mut row_number = 0_usize;
    for examples in &scenario.examples {
        let Some(table) = &examples.table else {
            continue;
        };
        let mut rows = table.rows.iter();
        let Some(header) = rows.next() else {
            continue;
        };
        let mut example_tags = tags.clone();
        example_tags.extend(examples.tags.iter().map(|tag| normalise_tag(tag)));

        for row in rows {
            row_number += 1;
            let mut steps = background.to_vec();
            steps.extend(own_steps.iter().map(|text| substitute(text, header, row)));
            planned.push(PlannedScenario {
                name: format!("{} (example {row_number})", scenario.name),
                tags: example_tags.clone(),
                steps,
            });
        }
    }
    planned
}

fn substitute(text: &str, header: &[String], row: &[String]) -> String {
    header
        .iter()
        .zip(row)
        .fold(text.to_owned(), |acc, (column, value)| {
            acc.replace(&format!("<{column}>"), value)
        })
}
