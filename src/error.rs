//! Semantic error types for the acceptance harness.
//!
//! Conditions a caller may inspect (a missing property file, a fatal check,
//! an unbound step) are modelled as `thiserror` enums. Opaque reporting with
//! `eyre::Report` is reserved for the binary boundary.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading harness configuration or property files.
///
/// These are setup failures: a scenario that hits one aborts before any step
/// runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration or property file was not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the file was expected.
        path: Utf8PathBuf,
    },

    /// A configuration file could not be read or parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value or property key is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field or key.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during layer merging.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised by the browser session or the WebDriver endpoint.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// A WebDriver session could not be created.
    #[error("failed to launch browser via {endpoint}: {message}")]
    LaunchFailed {
        /// The WebDriver endpoint that was contacted.
        endpoint: String,
        /// A description of the failure.
        message: String,
    },

    /// Navigation to a URL failed.
    #[error("failed to navigate to {url}: {message}")]
    NavigationFailed {
        /// The target URL.
        url: String,
        /// A description of the failure.
        message: String,
    },

    /// A WebDriver command failed.
    #[error("browser command '{command}' failed: {message}")]
    CommandFailed {
        /// The command that failed (for example `click`).
        command: String,
        /// A description of the failure.
        message: String,
    },

    /// A locator matched no element at the requested index.
    #[error("no element matches {locator} at index {index}")]
    ElementNotFound {
        /// A display form of the locator.
        locator: String,
        /// The requested match index.
        index: usize,
    },

    /// A step needed a browser but the scenario has no active session.
    #[error("no active browser session")]
    NoSession,
}

/// Errors raised by the assertion protocol.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A fatal check failed; the scenario must stop.
    #[error("check failed: {description}{}", render_detail(.detail.as_deref()))]
    Fatal {
        /// The named check that failed.
        description: String,
        /// Expected/actual or other diagnostic detail.
        detail: Option<String>,
    },
}

fn render_detail(detail: Option<&str>) -> String {
    detail.map(|text| format!(" ({text})")).unwrap_or_default()
}

/// Errors raised while binding or dispatching step text.
#[derive(Debug, Error)]
pub enum StepError {
    /// No bound pattern matches the step text.
    #[error("undefined step: {text}")]
    UndefinedStep {
        /// The unmatched step text.
        text: String,
    },

    /// A step pattern is not a valid regular expression.
    #[error("invalid step pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The regex compiler's message.
        message: String,
    },

    /// A step procedure received fewer captures than it needs.
    #[error("step '{pattern}' expected {expected} argument(s), got {actual}")]
    ArgumentMismatch {
        /// The bound pattern.
        pattern: String,
        /// Number of captures the procedure reads.
        expected: usize,
        /// Number of captures supplied.
        actual: usize,
    },

    /// A feature file could not be parsed.
    #[error("failed to parse feature file {path}: {message}")]
    FeatureParse {
        /// The feature file path.
        path: Utf8PathBuf,
        /// The parser's message.
        message: String,
    },
}

/// Errors raised by the external command-line tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool process could not be spawned.
    #[error("failed to spawn '{program}': {message}")]
    SpawnFailed {
        /// The program that was invoked.
        program: String,
        /// A description of the failure.
        message: String,
    },

    /// The tool ran but exited unsuccessfully.
    #[error("'{program}' exited with status {code:?}")]
    ExitFailure {
        /// The program that was invoked.
        program: String,
        /// The exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },

    /// The server probe could not reach its address.
    #[error("server at {address} is unreachable: {message}")]
    Unreachable {
        /// The probed `host:port`.
        address: String,
        /// A description of the failure.
        message: String,
    },
}

/// Errors raised during filesystem operations.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// A file or directory was not found.
    #[error("path not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: Utf8PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error at '{path}': {message}")]
    IoError {
        /// The path where the error occurred.
        path: Utf8PathBuf,
        /// A description of the I/O error.
        message: String,
    },
}

/// Top-level error type for the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration or property loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The browser session failed.
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// A fatal check failed.
    #[error(transparent)]
    Check(#[from] CheckError),

    /// Step binding or dispatch failed.
    #[error(transparent)]
    Step(#[from] StepError),

    /// The external tool failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// A filesystem operation failed.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// A specialised `Result` type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
