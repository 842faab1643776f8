//! Regex step binding.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use regex::Regex;

use super::ScenarioContext;
use crate::error::{Result, StepError};

/// Future returned by a step procedure.
pub type StepFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// A step procedure: the scenario context plus the pattern's captures.
pub type StepFn = for<'a> fn(&'a mut ScenarioContext, &'a [String]) -> StepFuture<'a>;

struct StepDefinition {
    pattern: Regex,
    source: String,
    procedure: StepFn,
}

/// Ordered set of step patterns; the first match wins.
#[derive(Default)]
pub struct StepCatalogue {
    steps: Vec<StepDefinition>,
}

impl fmt::Debug for StepCatalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|step| &step.source))
            .finish()
    }
}

impl StepCatalogue {
    /// An empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `pattern` to `procedure`.
    ///
    /// The pattern must match the whole step text. `arity` is the number of
    /// arguments the procedure reads and must equal the pattern's capture
    /// group count.
    ///
    /// # Errors
    ///
    /// Returns `StepError::InvalidPattern` when the pattern does not compile
    /// and `StepError::ArgumentMismatch` when the group count differs from
    /// `arity`.
    pub fn bind(
        &mut self,
        pattern: &str,
        arity: usize,
        procedure: StepFn,
    ) -> std::result::Result<(), StepError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|error| {
            StepError::InvalidPattern {
                pattern: pattern.to_owned(),
                message: error.to_string(),
            }
        })?;

        let groups = regex.captures_len().saturating_sub(1);
        if groups != arity {
            return Err(StepError::ArgumentMismatch {
                pattern: pattern.to_owned(),
                expected: arity,
                actual: groups,
            });
        }

        self.steps.push(StepDefinition {
            pattern: regex,
            source: pattern.to_owned(),
            procedure,
        });
        Ok(())
    }

    /// Find the procedure for `text` and extract its arguments.
    ///
    /// Unmatched optional groups yield empty strings.
    ///
    /// # Errors
    ///
    /// Returns `StepError::UndefinedStep` when no pattern matches.
    pub fn find(&self, text: &str) -> std::result::Result<(StepFn, Vec<String>), StepError> {
        let step_text = text.trim();
        self.steps
            .iter()
            .find_map(|step| {
                step.pattern.captures(step_text).map(|captures| {
                    let args = captures
                        .iter()
                        .skip(1)
                        .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
                        .collect();
                    (step.procedure, args)
                })
            })
            .ok_or_else(|| StepError::UndefinedStep {
                text: step_text.to_owned(),
            })
    }

    /// Run the step matching `text`.
    ///
    /// # Errors
    ///
    /// Returns `StepError::UndefinedStep` when nothing matches, otherwise
    /// whatever the step procedure returns.
    pub async fn dispatch(&self, ctx: &mut ScenarioContext, text: &str) -> Result<()> {
        let (procedure, args) = self.find(text)?;
        tracing::info!(scenario = %ctx.name(), step = text.trim(), "running step");
        procedure(ctx, &args).await
    }

    /// Bound patterns in binding order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.source.as_str())
    }

    /// Number of bound steps.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no steps are bound.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
