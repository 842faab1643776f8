//! Scenario execution: per-scenario state, step binding, hooks and the
//! feature runner.
//!
//! Each scenario gets a fresh [`ScenarioContext`]. Steps receive it mutably
//! and use it to reach the browser session, resolve property keys, pass
//! clipboard data between steps and record checks. Nothing outlives the
//! scenario: the context is dropped once the after hook has closed the
//! browser.
//!
//! # Checks
//!
//! Every assertion goes through [`ScenarioContext::confirm`] or one of its
//! variants. A check is always recorded. A failed check with
//! [`Severity::Fatal`] also returns `Err(CheckError::Fatal)`, which a step
//! propagates with `?` to end the scenario. A failed check with
//! [`Severity::Continue`] returns `Ok(false)` and the step carries on.
//!
//! ```no_run
//! # use gitserver_harness::scenario::{ScenarioContext, Severity};
//! # fn demo(ctx: &mut ScenarioContext) -> Result<(), gitserver_harness::error::CheckError> {
//! let mark = ctx.mark();
//! ctx.confirm("User name is entered", true, Severity::Continue)?;
//! ctx.confirm("Password is entered", true, Severity::Continue)?;
//! ctx.confirm_since(mark, "Login form is completed", Severity::Fatal)?;
//! # Ok(())
//! # }
//! ```

mod catalogue;
mod checks;
pub mod hooks;
mod runner;


use std::fmt::{self, Display};
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use mockable::DefaultEnv;
use regex::Regex;

pub use catalogue::{StepCatalogue, StepFn, StepFuture};
pub use checks::{CheckLog, CheckRecord, Mark, Severity};
pub use runner::{FeatureReport, FeatureRunner, ScenarioOutcome};

use crate::browser::{BrowserLauncher, FantocciniLauncher, LaunchSettings, WebDriverResolver};
use crate::config::HarnessConfig;
use crate::error::{BrowserError, CheckError, Result};
use crate::pages::{PageRegistry, Waits};
use crate::probe::{ServiceProbe, TcpProbe};
use crate::properties::{EscapePolicy, NOT_FOUND, PropertyMap};
use crate::session::{Session, SessionSettings};
use crate::tool::{CliTool, CommandRunner, ProcessRunner};

/// External collaborators a scenario talks to.
#[derive(Clone)]
pub struct Services {
    /// Opens browser sessions.
    pub launcher: Arc<dyn BrowserLauncher>,
    /// Runs the external command-line tool.
    pub commands: Arc<dyn CommandRunner>,
    /// Checks the server is reachable.
    pub probe: Arc<dyn ServiceProbe>,
}

impl Services {
    /// WebDriver, child processes and TCP.
    #[must_use]
    pub fn production() -> Self {
        Self {
            launcher: Arc::new(FantocciniLauncher),
            commands: Arc::new(ProcessRunner),
            probe: Arc::new(TcpProbe),
        }
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// State owned by one running scenario.
pub struct ScenarioContext {
    name: String,
    tags: Vec<String>,
    config: Arc<HarnessConfig>,
    services: Services,
    session: Option<Session>,
    test_data: PropertyMap,
    cli_config: PropertyMap,
    clipboard: Option<String>,
    checks: CheckLog,
}

impl fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("session", &self.session)
            .field("clipboard", &self.clipboard)
            .field("checks", &self.checks.len())
            .finish_non_exhaustive()
    }
}

impl ScenarioContext {
    /// A fresh context with no session and empty property maps.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        tags: Vec<String>,
        config: Arc<HarnessConfig>,
        services: Services,
    ) -> Self {
        Self {
            name: name.into(),
            tags,
            config,
            services,
            session: None,
            test_data: PropertyMap::default(),
            cli_config: PropertyMap::default(),
            clipboard: None,
            checks: CheckLog::default(),
        }
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags in effect, without the leading `@`.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether `tag` (with or without `@`) applies to this scenario.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim_start_matches('@');
        self.tags
            .iter()
            .any(|candidate| candidate.trim_start_matches('@') == wanted)
    }

    /// Harness configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// External collaborators.
    #[must_use]
    pub const fn services(&self) -> &Services {
        &self.services
    }

    /// Wait tiers from the configuration.
    #[must_use]
    pub fn waits(&self) -> Waits {
        Waits::from(&self.config.timeouts)
    }

    /// Load the test-data file (escaped) and the CLI config file (raw).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` or `ConfigError::ParseError` for
    /// either file, and `ConfigError::MissingRequired` when the test data
    /// lacks the configured required key.
    pub fn load_properties(&mut self) -> Result<()> {
        let data = &self.config.data;
        let test_data = PropertyMap::load(&data.test_data_path(), EscapePolicy::Escaped)?;
        test_data.require(&[data.required_key.as_str()])?;
        let cli_config = PropertyMap::load(&data.cli_config_path(), EscapePolicy::Raw)?;

        self.test_data = test_data;
        self.cli_config = cli_config;
        Ok(())
    }

    /// Test-data value for `key`, or the not-found sentinel.
    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        let value = self.test_data.lookup(key);
        if value == NOT_FOUND {
            tracing::warn!(key, "test data key not found");
        }
        value.to_owned()
    }

    /// CLI config value for `key`, or the not-found sentinel.
    #[must_use]
    pub fn resolve_cli(&self, key: &str) -> String {
        let value = self.cli_config.lookup(key);
        if value == NOT_FOUND {
            tracing::warn!(key, "CLI config key not found");
        }
        value.to_owned()
    }

    /// The external tool bound to the CLI project directory.
    #[must_use]
    pub fn tool(&self) -> CliTool {
        CliTool::new(
            &self.config.tool,
            &self.config.data.project_dir,
            Arc::clone(&self.services.commands),
        )
    }

    /// Resolve `path` against the CLI project directory.
    #[must_use]
    pub fn project_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        self.config.data.resolve(path)
    }

    /// Open a browser on the configured base URL, replacing any open one.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::LaunchFailed` or `BrowserError::NavigationFailed`.
    pub async fn start_session(&mut self) -> std::result::Result<(), BrowserError> {
        self.end_session().await;

        let settings = SessionSettings {
            base_url: self.config.base_url().to_owned(),
            launch: LaunchSettings {
                webdriver_url: WebDriverResolver::new(&DefaultEnv::new())
                    .resolve(self.config.webdriver_url.as_deref()),
                kind: self.config.browser.kind,
                headless: self.config.browser.headless,
            },
        };
        let session = Session::start(self.services.launcher.as_ref(), &settings).await?;
        self.session = Some(session);
        Ok(())
    }

    /// The open session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Pages over the open session.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::NoSession` when no browser is open.
    pub fn pages(&self) -> std::result::Result<PageRegistry, BrowserError> {
        let session = self.session.as_ref().ok_or(BrowserError::NoSession)?;
        Ok(PageRegistry::new(session.browser(), self.waits()))
    }

    /// Re-arm console capture on the page the browser now shows.
    pub async fn watch_console(&self) {
        if let Some(session) = &self.session {
            session.watch_console().await;
        }
    }

    /// Capture the browser log and close the browser.
    ///
    /// Does nothing without a session. Failures are logged only.
    pub async fn end_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        match session.capture_log().await {
            Some(log) => tracing::info!(scenario = %self.name, "browser log\n{log}"),
            None => tracing::warn!(scenario = %self.name, "browser log unavailable"),
        }
        session.quit().await;
    }

    /// Data copied by an earlier step.
    #[must_use]
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Store copied data; `None` clears the slot.
    pub fn set_clipboard(&mut self, value: Option<String>) {
        self.clipboard = value;
    }

    /// Checks recorded so far.
    #[must_use]
    pub const fn checks(&self) -> &CheckLog {
        &self.checks
    }

    /// Take the check log.
    #[must_use]
    pub fn into_checks(self) -> CheckLog {
        self.checks
    }

    /// The current end of the check log.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        self.checks.mark()
    }

    /// Record that `condition` holds.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Fatal` when the check fails with
    /// [`Severity::Fatal`].
    pub fn confirm(
        &mut self,
        description: impl Into<String>,
        condition: bool,
        severity: Severity,
    ) -> std::result::Result<bool, CheckError> {
        self.record(description.into(), condition, None, severity)
    }

    /// Record that `actual` contains `expected`.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Fatal` on a fatal failure.
    pub fn confirm_contains(
        &mut self,
        description: impl Into<String>,
        expected: &str,
        actual: &str,
        severity: Severity,
    ) -> std::result::Result<bool, CheckError> {
        let passed = actual.contains(expected);
        let detail = (!passed).then(|| format!("expected to contain '{expected}', got '{actual}'"));
        self.record(description.into(), passed, detail, severity)
    }

    /// Record that `actual` matches the regular expression `pattern`.
    ///
    /// An invalid pattern fails the check.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Fatal` on a fatal failure.
    pub fn confirm_matches(
        &mut self,
        description: impl Into<String>,
        pattern: &str,
        actual: &str,
        severity: Severity,
    ) -> std::result::Result<bool, CheckError> {
        let (passed, detail) = match Regex::new(pattern) {
            Ok(regex) if regex.is_match(actual) => (true, None),
            Ok(_) => (
                false,
                Some(format!("expected to match '{pattern}', got '{actual}'")),
            ),
            Err(error) => (false, Some(format!("invalid pattern '{pattern}': {error}"))),
        };
        self.record(description.into(), passed, detail, severity)
    }

    /// Record that `actual` is present and equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Fatal` on a fatal failure.
    pub fn confirm_equals(
        &mut self,
        description: impl Into<String>,
        expected: &str,
        actual: Option<&str>,
        severity: Severity,
    ) -> std::result::Result<bool, CheckError> {
        let passed = actual == Some(expected);
        let detail = (!passed).then(|| {
            format!(
                "expected '{expected}', got {}",
                actual.map_or_else(|| String::from("nothing"), |value| format!("'{value}'"))
            )
        });
        self.record(description.into(), passed, detail, severity)
    }

    /// Record that `value` is present.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Fatal` on a fatal failure.
    pub fn confirm_present<T>(
        &mut self,
        description: impl Into<String>,
        value: Option<&T>,
        severity: Severity,
    ) -> std::result::Result<bool, CheckError>
    where
        T: ?Sized,
    {
        let passed = value.is_some();
        let detail = (!passed).then(|| String::from("no value"));
        self.record(description.into(), passed, detail, severity)
    }

    /// Fatal presence check that hands back the value.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Fatal` when `value` is `None`.
    pub fn require<T>(
        &mut self,
        description: impl Into<String>,
        value: Option<T>,
    ) -> std::result::Result<T, CheckError> {
        match value {
            Some(found) => {
                self.record(description.into(), true, None, Severity::Fatal)?;
                Ok(found)
            }
            None => {
                let text = description.into();
                let detail = Some(String::from("no value"));
                self.push(&text, false, detail.clone(), Severity::Fatal);
                Err(CheckError::Fatal {
                    description: text,
                    detail,
                })
            }
        }
    }

    /// Record that `result` succeeded, keeping its value.
    ///
    /// A failure records the error as the check detail and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Fatal` on a fatal failure.
    pub fn confirm_ok<T, E: Display>(
        &mut self,
        description: impl Into<String>,
        result: std::result::Result<T, E>,
        severity: Severity,
    ) -> std::result::Result<Option<T>, CheckError> {
        match result {
            Ok(value) => {
                self.record(description.into(), true, None, severity)?;
                Ok(Some(value))
            }
            Err(error) => {
                self.record(description.into(), false, Some(error.to_string()), severity)?;
                Ok(None)
            }
        }
    }

    /// Record a summary that passes only if every check since `mark` passed.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Fatal` on a fatal failure.
    pub fn confirm_since(
        &mut self,
        mark: Mark,
        summary: impl Into<String>,
        severity: Severity,
    ) -> std::result::Result<bool, CheckError> {
        let failed: Vec<String> = self
            .checks
            .since(mark)
            .iter()
            .filter(|record| !record.passed)
            .map(|record| record.description.clone())
            .collect();
        let detail = (!failed.is_empty()).then(|| format!("failed: {}", failed.join("; ")));
        self.record(summary.into(), failed.is_empty(), detail, severity)
    }

    fn record(
        &mut self,
        description: String,
        passed: bool,
        detail: Option<String>,
        severity: Severity,
    ) -> std::result::Result<bool, CheckError> {
        self.push(&description, passed, detail.clone(), severity);
        if !passed && severity == Severity::Fatal {
            return Err(CheckError::Fatal {
                description,
                detail,
            });
        }
        Ok(passed)
    }

    fn push(&mut self, description: &str, passed: bool, detail: Option<String>, severity: Severity) {
        if passed {
            tracing::info!(check = description, "PASS");
        } else {
            tracing::warn!(
                check = description,
                detail = detail.as_deref().unwrap_or(""),
                fatal = severity == Severity::Fatal,
                "FAIL"
            );
        }
        self.checks.record(CheckRecord {
            description: description.to_owned(),
            passed,
            severity,
            detail,
        });
    }
}
