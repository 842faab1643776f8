//! Configuration system for the harness.
//!
//! Precedence, lowest to highest: defaults, configuration file, environment
//! variables (`GITSERVER_HARNESS_*`), command-line flags.
//!
//! # Example Configuration
//!
//! ```toml
//! base_url = "http://qa-host:8080/git-server"
//! webdriver_url = "http://localhost:9515"
//!
//! [browser]
//! kind = "chrome"
//! headless = true
//!
//! [timeouts]
//! short_ms = 5000
//! long_ms = 30000
//! poll_interval_ms = 250
//!
//! [data]
//! project_dir = "/work/cli-tests"
//! test_data = "gui_ac/git-server/initial-git-server-depot.cfg"
//! cli_config = "cli.cfg"
//!
//! [setup]
//! template = "/work/cli-tests/gui_ac/git-server/empty_config.properties"
//! live = "/opt/gitserver/WEB-INF/config.properties"
//!
//! [tool]
//! program = "clitest"
//! args = ["-k", "{script}"]
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, LookupArgs, RunArgs};
pub use loader::{env_var_names, load_config};
pub use types::{
    BrowserConfig, BrowserKind, DEFAULT_BASE_URL, DataConfig, HarnessConfig, ProbeConfig,
    SetupConfig, TimeoutConfig, ToolConfig,
};
