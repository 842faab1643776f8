//! Configuration data types for the harness.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use url::Url;

use crate::error::{ConfigError, Result};
use crate::files;

/// Target URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/git-server";

/// The browser a WebDriver session asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome or Chromium via chromedriver.
    #[default]
    Chrome,
    /// Mozilla Firefox via geckodriver.
    Firefox,
}

/// Browser session settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct BrowserConfig {
    /// Which browser to request.
    pub kind: BrowserKind,

    /// Run without a visible window.
    #[default = true]
    pub headless: bool,
}

/// Wait tiers for page polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Short wait, used for probes of elements expected to be present already.
    #[default = 5_000]
    pub short_ms: u64,

    /// Long wait, used after navigation or server round-trips.
    #[default = 30_000]
    pub long_ms: u64,

    /// Delay between polls.
    #[default = 250]
    pub poll_interval_ms: u64,
}

impl TimeoutConfig {
    /// Short wait as a `Duration`.
    #[must_use]
    pub const fn short(&self) -> Duration {
        Duration::from_millis(self.short_ms)
    }

    /// Long wait as a `Duration`.
    #[must_use]
    pub const fn long(&self) -> Duration {
        Duration::from_millis(self.long_ms)
    }

    /// Poll interval as a `Duration`.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: String::from("timeouts.poll_interval_ms"),
                reason: String::from("must be greater than zero"),
            }
            .into());
        }
        if self.long_ms < self.short_ms {
            return Err(ConfigError::InvalidValue {
                field: String::from("timeouts.long_ms"),
                reason: String::from("must be at least timeouts.short_ms"),
            }
            .into());
        }
        Ok(())
    }
}

/// Locations of the property files a scenario loads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct DataConfig {
    /// Root of the CLI test project; relative paths resolve against it.
    #[default(Utf8PathBuf::from("."))]
    pub project_dir: Utf8PathBuf,

    /// Test-data property file (escaped syntax).
    #[default(Utf8PathBuf::from("gui_ac/git-server/initial-git-server-depot.cfg"))]
    pub test_data: Utf8PathBuf,

    /// CLI tool property file (raw syntax).
    #[default(Utf8PathBuf::from("cli.cfg"))]
    pub cli_config: Utf8PathBuf,

    /// Key that must be present in the test-data file.
    #[default = "DEPOT"]
    pub required_key: String,
}

impl DataConfig {
    /// Resolved path of the test-data file.
    #[must_use]
    pub fn test_data_path(&self) -> Utf8PathBuf {
        files::resolve(&self.project_dir, &self.test_data)
    }

    /// Resolved path of the CLI config file.
    #[must_use]
    pub fn cli_config_path(&self) -> Utf8PathBuf {
        files::resolve(&self.project_dir, &self.cli_config)
    }

    /// Resolve any path against the project directory.
    #[must_use]
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        files::resolve(&self.project_dir, path)
    }
}

/// Reset of the product's live configuration for `@NewSetup` scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct SetupConfig {
    /// Template copied over the live file.
    pub template: Option<Utf8PathBuf>,

    /// The server's live configuration file.
    pub live: Option<Utf8PathBuf>,

    /// Pause before and after the copy.
    #[default = 250]
    pub settle_ms: u64,
}

impl SetupConfig {
    /// Both paths, when configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` naming the absent fields.
    pub fn paths(&self) -> Result<(&Utf8Path, &Utf8Path)> {
        match (self.template.as_deref(), self.live.as_deref()) {
            (Some(template), Some(live)) => Ok((template, live)),
            (template, live) => {
                let mut missing = Vec::new();
                if template.is_none() {
                    missing.push("setup.template");
                }
                if live.is_none() {
                    missing.push("setup.live");
                }
                Err(ConfigError::MissingRequired {
                    field: missing.join(", "),
                }
                .into())
            }
        }
    }

    /// Settle delay as a `Duration`.
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// The external command-line tool used for clones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct ToolConfig {
    /// Program to run.
    #[default = "clitest"]
    pub program: String,

    /// Arguments; `{script}` is replaced with the resolved clone script.
    #[default(vec![String::from("-k"), String::from("{script}")])]
    pub args: Vec<String>,

    /// Script handed to the tool for the clone scenario.
    #[default(Utf8PathBuf::from("gui_ac/git-server/clonerepo"))]
    pub clone_script: Utf8PathBuf,

    /// Property file the clone scenario writes for the tool.
    #[default(Utf8PathBuf::from("gui_ac/git-server/clonerepo.cfg"))]
    pub clone_config: Utf8PathBuf,

    /// CLI-config key naming the tool's scratch directory.
    #[default = "SCRATCH_AREA"]
    pub scratch_key: String,
}

/// Reachability probe for the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct ProbeConfig {
    /// `host:port` to connect to; derived from the base URL when unset.
    pub address: Option<String>,

    /// Connection timeout.
    #[default = 3_000]
    pub timeout_ms: u64,
}

impl ProbeConfig {
    /// Connection timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Root harness configuration.
///
/// Loaded with layered precedence: defaults, configuration file,
/// environment variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `GITSERVER_HARNESS_CONFIG_PATH`
/// 2. `.gitserver-harness.toml` in the current working directory
/// 3. `.gitserver-harness.toml` in the home directory
/// 4. `~/.config/gitserver-harness/config.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "GITSERVER_HARNESS",
    post_merge_hook,
    discovery(
        app_name = "gitserver-harness",
        env_var = "GITSERVER_HARNESS_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".gitserver-harness.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct HarnessConfig {
    /// URL of the git server front-end.
    pub base_url: Option<String>,

    /// WebDriver endpoint.
    pub webdriver_url: Option<String>,

    /// Browser settings.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub browser: BrowserConfig,

    /// Wait tiers.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub timeouts: TimeoutConfig,

    /// Property file locations.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub data: DataConfig,

    /// Live configuration reset.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub setup: SetupConfig,

    /// External tool.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub tool: ToolConfig,

    /// Server probe.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub probe: ProbeConfig,
}

impl HarnessConfig {
    /// The target URL, falling back to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// The `host:port` the server probe connects to.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when no address is configured and
    /// the base URL has no host.
    pub fn probe_address(&self) -> Result<String> {
        if let Some(address) = &self.probe.address {
            return Ok(address.clone());
        }
        let url = parse_base_url(self.base_url())?;
        let host = url.host_str().ok_or_else(|| ConfigError::InvalidValue {
            field: String::from("base_url"),
            reason: String::from("URL has no host"),
        })?;
        let port = url.port_or_known_default().unwrap_or(80);
        Ok(format!("{host}:{port}"))
    }

    /// Check cross-field invariants after merging.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unparseable base URL or
    /// inconsistent timeouts.
    pub fn validate(&self) -> Result<()> {
        parse_base_url(self.base_url())?;
        self.timeouts.validate()
    }
}

impl PostMergeHook for HarnessConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        if let Some(url) = self.base_url.as_mut() {
            let trimmed_len = url.trim_end_matches('/').len();
            url.truncate(trimmed_len);
        }
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|error| {
        ConfigError::InvalidValue {
            field: String::from("base_url"),
            reason: error.to_string(),
        }
        .into()
    })
}
