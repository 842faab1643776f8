//! The external command-line test tool.
//!
//! Repo clones are verified by handing a script to a separate CLI tool. The
//! harness writes the tool's inputs as a raw property file, runs it in the
//! CLI project directory, then checks the files it left behind.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::ToolConfig;
use crate::error::ToolError;

/// Placeholder in tool arguments replaced by the script path.
pub const SCRIPT_PLACEHOLDER: &str = "{script}";

/// Boxed future returned by [`CommandRunner`] and probe implementors.
pub type ToolFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ToolError>> + Send + 'a>>;

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run.
    pub program: String,
    /// Arguments, placeholders already substituted.
    pub args: Vec<String>,
    /// Directory the program runs in.
    pub working_dir: Utf8PathBuf,
}

/// Runs external programs.
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` to completion; success means exit status zero.
    fn run(&self, invocation: &Invocation) -> ToolFuture<'_, ()>;
}

/// Runs programs as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> ToolFuture<'_, ()> {
        let command_line = invocation.clone();
        Box::pin(async move {
            tracing::info!(
                program = %command_line.program,
                args = ?command_line.args,
                dir = %command_line.working_dir,
                "running external tool"
            );
            let status = tokio::process::Command::new(&command_line.program)
                .args(&command_line.args)
                .current_dir(command_line.working_dir.as_std_path())
                .stdin(Stdio::null())
                .status()
                .await
                .map_err(|e| ToolError::SpawnFailed {
                    program: command_line.program.clone(),
                    message: e.to_string(),
                })?;

            if status.success() {
                Ok(())
            } else {
                Err(ToolError::ExitFailure {
                    program: command_line.program,
                    code: status.code(),
                })
            }
        })
    }
}

/// The configured CLI tool bound to a project directory.
#[derive(Clone)]
pub struct CliTool {
    program: String,
    args: Vec<String>,
    project_dir: Utf8PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl CliTool {
    /// Bind the tool configuration to `project_dir`.
    #[must_use]
    pub fn new(config: &ToolConfig, project_dir: &Utf8Path, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            project_dir: project_dir.to_path_buf(),
            runner,
        }
    }

    /// The command line that runs `script`.
    #[must_use]
    pub fn invocation(&self, script: &Utf8Path) -> Invocation {
        Invocation {
            program: self.program.clone(),
            args: self
                .args
                .iter()
                .map(|arg| arg.replace(SCRIPT_PLACEHOLDER, script.as_str()))
                .collect(),
            working_dir: self.project_dir.clone(),
        }
    }

    /// Run `script` through the tool.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::SpawnFailed` or `ToolError::ExitFailure`.
    pub async fn run_script(&self, script: &Utf8Path) -> Result<(), ToolError> {
        self.runner.run(&self.invocation(script)).await
    }
}

/// Where a copied repo URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneTarget {
    /// Repo name: the last path segment without `.git`.
    pub repo_name: String,
    /// The URL without its scheme, ready for credentials to be prefixed.
    pub target: String,
}

impl CloneTarget {
    /// Split a copied clone URL.
    ///
    /// Returns `None` for an empty URL or one ending in `/`.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        let trimmed = url.trim();
        let target = trimmed
            .split_once("://")
            .map_or(trimmed, |(_, rest)| rest);
        let last = target.rsplit('/').next()?;
        let repo_name = last.strip_suffix(".git").unwrap_or(last);
        if repo_name.is_empty() {
            return None;
        }
        Some(Self {
            repo_name: repo_name.to_owned(),
            target: target.to_owned(),
        })
    }
}
